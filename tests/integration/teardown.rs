//! Teardown-path tests: drain must leave no caller stuck, whatever the
//! renderer did or failed to do.

use screen_flash::{config, CompletionSignal, FlashCompletion, FlashRenderer, ScreenFlashGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Renderer modeling a UI layer that vanishes: it drops the completion
/// handle without ever signaling it.
struct VanishingRenderer {
    clears: AtomicUsize,
}

impl FlashRenderer for VanishingRenderer {
    fn apply(&self, completion: Box<dyn FlashCompletion>) {
        drop(completion);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn drain_unblocks_a_waiting_capture_task() {
    let renderer = Arc::new(VanishingRenderer {
        clears: AtomicUsize::new(0),
    });
    let guard = Arc::new(ScreenFlashGuard::new(Some(renderer.clone())));

    let signal = CompletionSignal::new(config::expiration_time_millis(config::APPLY_TIMEOUT));
    guard.apply(signal.handle());

    let waiter = {
        let signal = signal.clone();
        tokio::spawn(async move {
            signal.wait_completed().await;
            true
        })
    };

    // Give the task time to start waiting, then tear the session down.
    tokio::time::sleep(Duration::from_millis(50)).await;
    guard.drain();

    let result = tokio::time::timeout(Duration::from_secs(1), waiter).await;
    assert!(result.is_ok(), "capture task was left stuck after drain");
    assert!(signal.is_completed());
    assert_eq!(renderer.clears.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wait_returns_immediately_when_drained_first() {
    let guard = ScreenFlashGuard::new(Some(Arc::new(VanishingRenderer {
        clears: AtomicUsize::new(0),
    }) as Arc<dyn FlashRenderer>));

    let signal = CompletionSignal::new(config::expiration_time_millis(config::APPLY_TIMEOUT));
    guard.apply(signal.handle());
    guard.drain();

    let start = tokio::time::Instant::now();
    signal.wait_completed().await;
    let elapsed = start.elapsed();

    assert!(
        elapsed < Duration::from_millis(10),
        "wait_completed took too long after drain: {elapsed:?}"
    );
}

#[tokio::test]
async fn drain_with_absent_renderer_still_resolves() {
    let guard = ScreenFlashGuard::new(None);

    let signal = CompletionSignal::new(config::expiration_time_millis(config::APPLY_TIMEOUT));
    guard.apply(signal.handle());
    assert!(signal.is_completed());

    // Clear cannot be forwarded anywhere; drain must stay non-fatal.
    guard.drain();
}

#[test]
fn repeated_drain_forwards_clear_once() {
    let renderer = Arc::new(VanishingRenderer {
        clears: AtomicUsize::new(0),
    });
    let guard = ScreenFlashGuard::new(Some(renderer.clone()));

    let signal = CompletionSignal::new(config::expiration_time_millis(config::APPLY_TIMEOUT));
    guard.apply(signal.handle());

    guard.drain();
    guard.drain();
    guard.drain();

    assert!(signal.is_completed());
    assert_eq!(renderer.clears.load(Ordering::SeqCst), 1);
}
