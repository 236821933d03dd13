// src/infrastructure/rate_limiter.rs
use tokio::time::{sleep_until, Duration, Instant};
use tracing::trace;

use crate::domain::TransportError;

/// Spaces successive calls at least `min_interval` apart.
///
/// State is local to one instance; two limiters never coordinate.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    /// Fails with `Request` unless `calls_per_second` yields a representable interval.
    pub fn new(calls_per_second: f64) -> Result<Self, TransportError> {
        let min_interval = Self::interval_for(calls_per_second).ok_or_else(|| {
            TransportError::Request(format!(
                "rate limit must be a positive number with a representable interval, got {calls_per_second}"
            ))
        })?;
        Ok(Self {
            min_interval,
            last_call: None,
        })
    }

    /// Spacing between calls at `calls_per_second`, or `None` if the rate is not
    /// positive or the interval overflows `Duration`.
    pub fn interval_for(calls_per_second: f64) -> Option<Duration> {
        if !(calls_per_second.is_finite() && calls_per_second > 0.0) {
            return None;
        }
        Duration::try_from_secs_f64(1.0 / calls_per_second).ok()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_call(&self) -> Option<Instant> {
        self.last_call
    }

    /// Suspend until the interval since the previous call has passed, then record this call.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_call {
            let ready_at = last + self.min_interval;
            if Instant::now() < ready_at {
                trace!(wait = ?(ready_at - Instant::now()), "Rate limit: waiting");
                sleep_until(ready_at).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
