//! Courtesy rate limiting for providers without an enforced quota

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum-interval limiter shared by every request to one provider.
///
/// The timestamp of the last request is the only shared mutable state in
/// the crate. `throttle` holds the lock across the whole check-sleep-record
/// sequence so that concurrent callers serialize and the delay is always
/// measured against the actual previous request, not a fixed schedule.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until at least `min_interval` has passed since the previous
    /// request, then record the new request timestamp.
    pub async fn throttle(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        let start = Instant::now();
        limiter.throttle().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_back_to_back_calls_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        limiter.throttle().await;
        let start = Instant::now();
        limiter.throttle().await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_concurrent_callers_serialize() {
        use std::sync::Arc;

        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(30)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move { limiter.throttle().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Three requests need at least two full intervals between them
        assert!(start.elapsed() >= Duration::from_millis(60));
    }
}
