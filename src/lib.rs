//! # Screen Flash Handshake Library
//!
//! Thread-safe completion tracking for the screen flash UI handshake used
//! during photo capture. A capture pipeline asks the UI layer to render a
//! "flash" effect (typically a full-brightness white overlay) and must be
//! told, via a one-shot completion signal, when the effect is on screen so
//! the exposure can proceed.
//!
//! ## Features
//!
//! - **Exactly-Once Completion**: Every apply cycle resolves its completion
//!   handle exactly once, even when completion and cancellation race
//! - **Renderer-Optional**: A missing renderer never strands the caller;
//!   the handshake resolves immediately with a diagnostic
//! - **Forced Teardown**: [`ScreenFlashGuard::drain`] resolves any
//!   outstanding handshake when the owning capture session unbinds
//! - **Awaitable Signals**: [`CompletionSignal`] lets async capture code
//!   wait for the UI, bounded by the advisory expiration deadline
//!
//! ## Quick Start
//!
//! ```
//! use screen_flash::{config, CompletionSignal, ScreenFlashGuard};
//!
//! // Wrap the renderer supplied by the UI layer (absent here).
//! let guard = ScreenFlashGuard::new(None);
//!
//! // Arm a completion signal with the default apply deadline.
//! let signal = CompletionSignal::new(config::expiration_time_millis(config::APPLY_TIMEOUT));
//! guard.apply(signal.handle());
//!
//! // With no renderer configured the handshake resolves immediately.
//! assert!(signal.is_completed());
//! ```
//!
//! ## Architecture
//!
//! - [`guard`] - Completion-guarded dispatch to the flash renderer
//! - [`completion`] - Awaitable completion signals for the capture side
//! - [`config`] - Handshake timing constants and deadline arithmetic
//!
//! The renderer and the completion handle are capability traits
//! ([`FlashRenderer`], [`FlashCompletion`]); the UI layer implements the
//! former, and either side may implement the latter. Diagnostics are
//! emitted through [`tracing`] events, so whatever subscriber the host
//! application installs receives the non-fatal warnings and errors this
//! crate reports.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Awaitable completion signals for the capture side
pub mod completion;

/// Handshake timing constants and deadline arithmetic
pub mod config;

/// Completion-guarded dispatch to the flash renderer
pub mod guard;

// Re-export commonly used types
pub use completion::{CompletionSignal, WaitError};
pub use guard::ScreenFlashGuard;

/// One-shot completion signal for a flash apply cycle.
///
/// Completing consumes the handle, so signaling twice through the same
/// handle is unrepresentable. The deadline is advisory: this crate passes
/// it through unmodified and never enforces it.
pub trait FlashCompletion: Send {
    /// Signal that the flash effect has finished rendering.
    fn complete(self: Box<Self>);

    /// Advisory deadline (Unix timestamp in milliseconds) by which the
    /// effect should have been applied.
    fn expiration_time_millis(&self) -> i64;
}

/// Externally supplied surface that renders the flash effect.
///
/// Implemented by the UI layer and handed to [`ScreenFlashGuard::new`].
/// Calls may arrive from any thread; completion callbacks may likewise be
/// issued from any thread, including synchronously from within `apply`.
pub trait FlashRenderer: Send + Sync {
    /// Show the flash effect.
    ///
    /// The renderer must eventually complete `completion` exactly once,
    /// whether or not the effect was actually shown.
    fn apply(&self, completion: Box<dyn FlashCompletion>);

    /// Remove the flash effect.
    fn clear(&self);
}
