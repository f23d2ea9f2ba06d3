//! Single-fire startup signal.
//!
//! Released by the first completed session check, successful or not. Later
//! releases are no-ops, so observers see exactly one transition.

use tokio::sync::watch;

#[derive(Debug)]
pub struct StartupLatch {
    released: watch::Sender<bool>,
}

impl Default for StartupLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupLatch {
    pub fn new() -> Self {
        let (released, _) = watch::channel(false);
        Self { released }
    }

    /// Fire the latch. Returns `true` only for the call that fired it.
    pub fn release(&self) -> bool {
        self.released.send_if_modified(|released| {
            if *released {
                false
            } else {
                *released = true;
                true
            }
        })
    }

    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.released.subscribe()
    }

    /// Wait until the latch has fired. Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.released.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|released| *released).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_fires_once() {
        let latch = StartupLatch::new();
        assert!(!latch.is_released());

        assert!(latch.release());
        assert!(latch.is_released());

        assert!(!latch.release());
        assert!(latch.is_released());
    }

    #[tokio::test]
    async fn test_wait_returns_after_release() {
        let latch = Arc::new(StartupLatch::new());

        let waiter = {
            let latch = latch.clone();
            tokio::spawn(async move { latch.wait().await })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        latch.release();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should finish")
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_after_release_is_immediate() {
        let latch = StartupLatch::new();
        latch.release();
        tokio::time::timeout(Duration::from_millis(100), latch.wait())
            .await
            .expect("already released");
    }

    #[tokio::test]
    async fn test_subscriber_sees_single_transition() {
        let latch = StartupLatch::new();
        let mut rx = latch.subscribe();

        latch.release();
        latch.release();

        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
        assert!(!rx.has_changed().unwrap());
    }
}
