//! Retry with exponential backoff and jitter.
//!
//! The pipeline's sole backpressure mechanism against the embedding API:
//! transient failures (rate limits, network errors, 5xx) are retried with a
//! doubling delay plus random jitter; everything else propagates
//! immediately.

use crate::{PipelineError, Result};
use huddle_core::config::RetryConfig;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff policy for retried calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum attempts, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry. Doubles on each subsequent attempt.
    pub base_delay: Duration,

    /// Cap on the backoff delay (before jitter).
    pub max_delay: Duration,

    /// Upper bound on the uniform random jitter added to each delay.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Compute the delay before the retry following `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let backoff = self
            .base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay);

        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
        };

        backoff + jitter
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            max_jitter: Duration::from_millis(config.max_jitter_ms),
        }
    }
}

/// Run `op`, retrying transient failures per `policy`.
///
/// Only errors classified retryable by [`PipelineError::is_retryable`] are
/// retried; after the final attempt the original error propagates.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && err.is_retryable() => {
                let delay = policy.delay_for(attempt);
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient failure, backing off before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
