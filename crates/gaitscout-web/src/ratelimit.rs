//! Per-client rolling-window rate limiting for the refresh endpoint.

use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Allows at most `max` hits per client within the trailing `window`.
pub struct RollingWindow {
    max: usize,
    window: Duration,
    hits: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RollingWindow {
    pub fn new(max: usize, window: Duration) -> Self {
        Self {
            max,
            window,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Record a hit for `ip` if the window allows it. On refusal, returns
    /// the seconds until the oldest in-window hit expires.
    pub async fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        // Prune expired hits everywhere and drop clients left with none,
        // so the map does not grow with one-off callers.
        hits.retain(|_, stamps| {
            stamps.retain(|t| now.duration_since(*t) < self.window);
            !stamps.is_empty()
        });

        let entry = hits.entry(ip).or_default();
        if entry.len() >= self.max {
            let oldest = entry[0];
            let retry_after = self.window.saturating_sub(now.duration_since(oldest));
            return Err(retry_after.as_secs().max(1));
        }

        entry.push(now);
        Ok(())
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.hits.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([127, 0, 0, last])
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_is_per_ip() {
        let limiter = RollingWindow::new(2, Duration::from_secs(60));

        assert!(limiter.check(ip(1)).await.is_ok());
        assert!(limiter.check(ip(1)).await.is_ok());
        assert!(limiter.check(ip(1)).await.is_err());
        assert!(limiter.check(ip(2)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_slides() {
        let limiter = RollingWindow::new(2, Duration::from_secs(60));

        limiter.check(ip(1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.check(ip(1)).await.unwrap();

        let retry_after = limiter.check(ip(1)).await.unwrap_err();
        assert!(retry_after <= 30);

        // First hit ages out of the window.
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(limiter.check(ip(1)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_clients_are_evicted() {
        let limiter = RollingWindow::new(2, Duration::from_secs(60));

        limiter.check(ip(1)).await.unwrap();
        limiter.check(ip(2)).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;

        // Only the fresh caller should remain tracked.
        limiter.check(ip(3)).await.unwrap();
        assert_eq!(limiter.tracked_clients().await, 1);
    }
}
