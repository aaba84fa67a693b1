//! Client-side rate limiting for upstream APIs.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Minimum-interval throttle shared by all calls to one upstream API.
/// Owned by the client that needs it, never global state.
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// acquire, then claim the current instant. Holding the lock across
    /// the sleep serialises concurrent callers.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!(?wait, "Throttling upstream call");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Exponential backoff delay before retry `n` (1-based): 10s, 20s, 40s.
pub fn backoff_delay(retry: u32) -> Duration {
    Duration::from_secs(10 * (1u64 << (retry - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        assert_eq!(backoff_delay(1), Duration::from_secs(10));
        assert_eq!(backoff_delay(2), Duration::from_secs(20));
        assert_eq!(backoff_delay(3), Duration::from_secs(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_spaces_out_calls() {
        let limiter = RateLimiter::new(Duration::from_secs(1));

        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_is_free_after_interval_elapses() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        limiter.acquire().await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        let before = Instant::now();
        limiter.acquire().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }
}
