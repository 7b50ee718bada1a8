use crate::remote::RemoteError;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff for remote writes.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub factor: f64,
    pub max_delay: Duration,
    /// Total attempts, the first try included.
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            factor: 1.5,
            max_delay: Duration::from_millis(10_000),
            max_attempts: 4,
        }
    }
}

impl BackoffPolicy {
    /// Delay after the failed attempt `retry` (0-based): `min(base * factor^retry, max)`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let scaled = self.base_delay.as_secs_f64() * self.factor.powi(retry as i32);
        if !scaled.is_finite() || scaled >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(scaled)
    }

    /// No waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            base_delay: Duration::ZERO,
            factor: 1.0,
            max_delay: Duration::ZERO,
            max_attempts,
        }
    }
}

/// Runs `op` until it succeeds, fails with a non-retryable error, or runs
/// out of attempts. Returns the last error in the latter two cases.
pub async fn with_retry<T, F, Fut>(policy: &BackoffPolicy, mut op: F) -> Result<T, RemoteError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable() => {
                tracing::debug!(attempt, code = %e.code, "Remote write failed, not retrying");
                return Err(e);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::warn!(attempt, error = %e, "Remote write failed, giving up");
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for(attempt - 1);
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Remote write failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
