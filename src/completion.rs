//! Awaitable completion signals for the capture side of the handshake.
//!
//! Provides [`CompletionSignal`], a lightweight one-shot flag the capture
//! pipeline can await while the UI layer renders the flash effect. The
//! capture side keeps a clone and waits on it; [`CompletionSignal::handle`]
//! mints the [`FlashCompletion`] that travels through
//! [`ScreenFlashGuard::apply`](crate::ScreenFlashGuard::apply).

use crate::config;
use crate::FlashCompletion;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Waiting on a completion signal failed.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// The advisory deadline passed before the UI reported completion.
    #[error("flash completion not signaled before expiration ({expiration_time_millis})")]
    Expired {
        /// The deadline that passed (Unix timestamp in milliseconds).
        expiration_time_millis: i64,
    },
}

/// One-shot completion flag shared between the capture pipeline and the
/// flash handshake.
///
/// Clones share the same underlying flag. Completion may be signaled from
/// any thread, including non-async UI-owned threads, and is observed here
/// without blocking.
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    completed: AtomicBool,
    notify: Notify,
    expiration_time_millis: i64,
}

impl CompletionSignal {
    /// Create a signal carrying the advisory expiration deadline.
    pub fn new(expiration_time_millis: i64) -> Self {
        Self {
            inner: Arc::new(Inner {
                completed: AtomicBool::new(false),
                notify: Notify::new(),
                expiration_time_millis,
            }),
        }
    }

    /// Mint a one-shot completion handle backed by this signal.
    ///
    /// Handles are independent; completing any one of them resolves the
    /// signal, and only the first completion wakes waiters.
    pub fn handle(&self) -> Box<dyn FlashCompletion> {
        Box::new(SignalHandle {
            signal: self.clone(),
        })
    }

    /// Whether completion has been signaled.
    pub fn is_completed(&self) -> bool {
        self.inner.completed.load(Ordering::SeqCst)
    }

    /// The advisory deadline carried by handles minted from this signal.
    pub fn expiration_time_millis(&self) -> i64 {
        self.inner.expiration_time_millis
    }

    /// Wait until completion is signaled. Returns immediately if already
    /// set.
    ///
    /// The waiter is registered before the final flag check, so a
    /// completion landing from a foreign thread between check and await is
    /// never missed.
    pub async fn wait_completed(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_completed() {
            return;
        }
        notified.await;
    }

    /// Wait until completion, bounded by the carried expiration deadline.
    ///
    /// The guard never enforces the deadline itself; this is the
    /// caller-side tool for honoring it.
    ///
    /// # Errors
    /// Returns [`WaitError::Expired`] when the deadline passes before the
    /// UI reports completion.
    pub async fn wait_until_expiration(&self) -> Result<(), WaitError> {
        let remaining = config::remaining_millis(self.inner.expiration_time_millis);
        if remaining <= 0 {
            if self.is_completed() {
                return Ok(());
            }
            return Err(WaitError::Expired {
                expiration_time_millis: self.inner.expiration_time_millis,
            });
        }

        tokio::time::timeout(Duration::from_millis(remaining as u64), self.wait_completed())
            .await
            .map_err(|_| WaitError::Expired {
                expiration_time_millis: self.inner.expiration_time_millis,
            })
    }
}

/// Adapter handed to the handshake; completing it resolves the signal.
struct SignalHandle {
    signal: CompletionSignal,
}

impl FlashCompletion for SignalHandle {
    fn complete(self: Box<Self>) {
        // Wake waiters on the first completion only.
        if !self.signal.inner.completed.swap(true, Ordering::SeqCst) {
            self.signal.inner.notify.notify_waiters();
        }
    }

    fn expiration_time_millis(&self) -> i64 {
        self.signal.inner.expiration_time_millis
    }
}
