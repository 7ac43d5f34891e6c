//! Outbound call throttling for the SOC API

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum-interval limiter
///
/// `wait()` returns once at least `1 / max_calls_per_second` has elapsed
/// since the previous `wait()` returned. The first call never waits.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(max_calls_per_second: u32) -> Self {
        let per_second = f64::from(max_calls_per_second.max(1));
        Self {
            min_interval: Duration::from_secs_f64(1.0 / per_second),
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}
