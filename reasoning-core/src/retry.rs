//! Exponential backoff with jitter, reserved for `Error::ExternalUnavailable`.
//!
//! Never applied to `Validation`, `NotFound` or `ConflictingWrite` — those
//! are never retried per the error propagation policy.

use std::time::Duration;

use tracing::warn;

use crate::error::Error;

/// Whether an error kind is eligible for retry.
pub trait Retryable {
    fn is_recoverable(&self) -> bool;
}

impl Retryable for Error {
    fn is_recoverable(&self) -> bool {
        self.is_recoverable()
    }
}

/// Backoff configuration.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Runs `op` with exponential backoff and jitter until it succeeds, a
/// non-recoverable error is returned, or `max_retries` is exhausted.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, Error>>,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < config.max_retries && err.is_recoverable() => {
                let delay = calculate_delay(config, attempt + 1);
                warn!(attempt, ?delay, error = %err, "retrying after recoverable error");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exp_delay = config.base_delay * 2u32.pow(attempt.saturating_sub(1));
    let delay = std::cmp::min(exp_delay, config.max_delay);

    if config.jitter_factor > 0.0 {
        let jitter_range = delay.as_millis() as f64 * config.jitter_factor;
        let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
        let adjusted_ms = (delay.as_millis() as f64 + jitter).max(0.0);
        Duration::from_millis(adjusted_ms as u64)
    } else {
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn retries_recoverable_errors_until_success() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default().with_max_retries(5);
        let result = with_retry(&config, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::ExternalUnavailable("flaky".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn never_retries_validation_errors() {
        let calls = AtomicU32::new(0);
        let config = RetryConfig::default();
        let result: Result<(), Error> = with_retry(&config, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(Error::Validation("bad input".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
