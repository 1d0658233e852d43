//! Completion-guarded dispatch to the flash renderer.
//!
//! Provides [`ScreenFlashGuard`], a mutex-protected wrapper around the
//! optional [`FlashRenderer`] that intercepts every completion exchange so
//! the owning capture session can force resolution when the handshake is
//! cancelled or torn down.

use crate::{FlashCompletion, FlashRenderer};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{error, warn};

/// Pending-cycle bookkeeping, guarded as one atomic unit.
#[derive(Default)]
struct Pending {
    /// True from the moment an apply cycle begins until a clear (or forced
    /// completion) resolves it.
    clear_pending: bool,
    /// The current cycle's completion handle while unresolved.
    handle: Option<Box<dyn FlashCompletion>>,
}

/// Tracks the one-shot completion handshake around an optional flash
/// renderer.
///
/// Every [`apply`](Self::apply) records the caller's completion handle
/// before the renderer sees anything, so a renderer that completes
/// synchronously still observes consistent state. The handle is resolved
/// exactly once per cycle: taking it out of the pending slot and invoking
/// it happen under the same bookkeeping, with the invocation itself made
/// after the lock is released so a fully synchronous renderer cannot
/// deadlock.
///
/// `apply`, `clear` and `drain` may be called concurrently from
/// independent threads, and the renderer's completion callback may fire on
/// yet another thread arbitrarily later.
pub struct ScreenFlashGuard {
    renderer: Option<Arc<dyn FlashRenderer>>,
    pending: Arc<Mutex<Pending>>,
}

impl ScreenFlashGuard {
    /// Wrap the renderer supplied by the UI layer, which may be absent.
    pub fn new(renderer: Option<Arc<dyn FlashRenderer>>) -> Self {
        Self {
            renderer,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    /// Request the flash effect and track `handle` as the cycle's pending
    /// completion.
    ///
    /// The handle is resolved exactly once: by the renderer's (possibly
    /// synchronous) completion callback, immediately when no renderer is
    /// configured, or by a later [`drain`](Self::drain). The renderer sees
    /// an intercepting handle carrying the original expiration deadline
    /// unmodified.
    ///
    /// A second `apply` before the previous handle resolves abandons that
    /// handle without completing it. Callers must not pipeline overlapping
    /// cycles without an intervening resolution or drain.
    pub fn apply(&self, handle: Box<dyn FlashCompletion>) {
        let expiration_time_millis = handle.expiration_time_millis();
        {
            let mut pending = self.pending.lock().unwrap();
            pending.clear_pending = true;
            pending.handle = Some(handle);
        }

        match &self.renderer {
            Some(renderer) => {
                renderer.apply(Box::new(InterceptingHandle {
                    pending: Arc::clone(&self.pending),
                    expiration_time_millis,
                }));
            }
            None => {
                error!("no flash renderer configured - completing immediately");
                complete_pending_handle(&self.pending);
            }
        }
    }

    /// Ask the renderer to remove the flash effect.
    ///
    /// Forwarded only when a cycle is actually pending; a clear with
    /// nothing pending is a warned no-op.
    pub fn clear(&self) {
        self.complete_pending_clear();
    }

    /// Force-resolve any outstanding handshake state during session
    /// teardown.
    ///
    /// Completes the pending handle (if any) without waiting for the
    /// renderer, then forwards the pending clear. Guarantees no completion
    /// handle is left unresolved and no clear request unforwarded when the
    /// owning session ends, regardless of whether the renderer ever called
    /// back.
    pub fn drain(&self) {
        complete_pending_handle(&self.pending);
        self.complete_pending_clear();
    }

    /// The wrapped renderer, if one was configured.
    ///
    /// No locking: the reference is immutable after construction.
    pub fn renderer(&self) -> Option<&Arc<dyn FlashRenderer>> {
        self.renderer.as_ref()
    }

    fn complete_pending_clear(&self) {
        let was_pending = {
            let mut pending = self.pending.lock().unwrap();
            std::mem::take(&mut pending.clear_pending)
        };

        if was_pending {
            match &self.renderer {
                Some(renderer) => renderer.clear(),
                None => error!("no flash renderer configured - cannot forward clear"),
            }
        } else {
            warn!("flash clear requested with no apply pending");
        }
    }
}

impl fmt::Debug for ScreenFlashGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenFlashGuard")
            .field("renderer_configured", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}

/// Take the pending handle out under the lock and complete it after
/// release. Returns whether a handle was actually resolved; the no-handle
/// case is benign (stale or duplicate signal) and logging it is the
/// caller's call.
fn complete_pending_handle(pending: &Mutex<Pending>) -> bool {
    let handle = pending.lock().unwrap().handle.take();
    match handle {
        Some(handle) => {
            handle.complete();
            true
        }
        None => false,
    }
}

/// Completion handle the renderer sees in place of the caller's own.
struct InterceptingHandle {
    pending: Arc<Mutex<Pending>>,
    expiration_time_millis: i64,
}

impl FlashCompletion for InterceptingHandle {
    fn complete(self: Box<Self>) {
        if !complete_pending_handle(&self.pending) {
            // Likely a duplicate or a signal from an already-drained cycle.
            warn!("flash completion signaled with no handle pending - ignoring");
        }
    }

    fn expiration_time_millis(&self) -> i64 {
        self.expiration_time_millis
    }
}
