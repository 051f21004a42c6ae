//! Single-slot feedback timer.
//!
//! At most one advance callback is ever pending. Arming replaces any
//! prior pending callback, so two feedback windows can never overlap.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owns the one pending feedback callback, if any.
///
/// Cancellation discipline lives here instead of at every call site:
/// `arm` always cancels first, and the engine cancels on advance, on a
/// new selection, and on restart.
#[derive(Default)]
pub struct FeedbackScheduler {
    pending: Option<JoinHandle<()>>,
}

impl FeedbackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot: after `delay`, run `then`. Replaces any pending callback.
    pub fn arm<F>(&mut self, delay: Duration, then: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            then.await;
        }));
    }

    /// Cancel the pending callback, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a callback is armed and has not yet run to completion.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for FeedbackScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_armed_callback_fires_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut scheduler = FeedbackScheduler::new();

        let counter = Arc::clone(&fired);
        scheduler.arm(Duration::from_secs(3), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.is_pending());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_arming_replaces_pending_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut scheduler = FeedbackScheduler::new();

        let first = Arc::clone(&fired);
        scheduler.arm(Duration::from_secs(1), async move {
            first.fetch_add(1, Ordering::SeqCst);
        });
        let second = Arc::clone(&fired);
        scheduler.arm(Duration::from_secs(2), async move {
            second.fetch_add(10, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(5)).await;
        // Only the replacement ran.
        assert_eq!(fired.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut scheduler = FeedbackScheduler::new();

        let counter = Arc::clone(&fired);
        scheduler.arm(Duration::from_secs(1), async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
