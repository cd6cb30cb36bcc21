use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Result of waiting out the quiescence delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    Ready,
    /// A newer keystroke arrived while this one was waiting.
    Superseded,
}

/// Trailing-edge debouncer. Each keystroke takes a ticket; only the ticket that is
/// still the latest once the delay elapses settles as `Ready`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn settle(&self, ticket: u64) -> Settle {
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) == ticket {
            Settle::Ready
        } else {
            Settle::Superseded
        }
    }

    /// Takes a ticket and waits on it.
    pub async fn wait(&self) -> Settle {
        let ticket = self.ticket();
        self.settle(ticket).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_waits_full_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(220));
        let start = Instant::now();
        assert_eq!(debouncer.wait().await, Settle::Ready);
        assert!(start.elapsed() >= Duration::from_millis(220));
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_ticket_supersedes_older() {
        let debouncer = Debouncer::new(Duration::from_millis(220));
        let first = debouncer.ticket();
        let second = debouncer.ticket();
        let (a, b) = tokio::join!(debouncer.settle(first), debouncer.settle(second));
        assert_eq!(a, Settle::Superseded);
        assert_eq!(b, Settle::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_during_wait_supersedes() {
        let debouncer = Debouncer::new(Duration::from_millis(220));
        let clone = debouncer.clone();
        let first = debouncer.ticket();
        let pending = tokio::spawn(async move { clone.settle(first).await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = debouncer.ticket();

        assert_eq!(pending.await.unwrap(), Settle::Superseded);
        assert_eq!(debouncer.settle(second).await, Settle::Ready);
    }
}
