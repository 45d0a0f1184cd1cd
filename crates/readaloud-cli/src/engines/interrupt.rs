//! Cancellation signal shared by the engines' `speak` and `cancel`.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Notify;

/// Cancellation epoch plus a wake-up for in-flight utterances.
///
/// `speak` reads the epoch when it starts and waits on
/// [`cancelled_since`](Self::cancelled_since); a `cancel` that lands before
/// the wait is registered still ends the utterance.
#[derive(Debug, Default)]
pub struct Interrupt {
    epoch: AtomicU64,
    notify: Notify,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Resolves once `cancel` has been called after `epoch` was read.
    pub async fn cancelled_since(&self, epoch: u64) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        if self.epoch() != epoch {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_cancel_before_wait_is_not_lost() {
        let interrupt = Interrupt::new();
        let epoch = interrupt.epoch();
        interrupt.cancel();

        tokio_test::block_on(interrupt.cancelled_since(epoch));
        assert_eq!(interrupt.epoch(), epoch + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_wakes_waiter() {
        let interrupt = Arc::new(Interrupt::new());
        let epoch = interrupt.epoch();
        let waiter = tokio::spawn({
            let interrupt = Arc::clone(&interrupt);
            async move { interrupt.cancelled_since(epoch).await }
        });

        tokio::task::yield_now().await;
        interrupt.cancel();

        assert!(tokio::time::timeout(Duration::from_secs(1), waiter).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_cancel_does_not_end_later_wait() {
        let interrupt = Interrupt::new();
        interrupt.cancel();
        let epoch = interrupt.epoch();

        let waited =
            tokio::time::timeout(Duration::from_secs(1), interrupt.cancelled_since(epoch)).await;
        assert!(waited.is_err());
    }
}
