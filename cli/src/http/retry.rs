//! Timeout and retry policy for logical client operations.
//!
//! The policy wraps whole resource-client calls so that each attempt builds
//! a fresh request. It never retries inside the transport.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::ClientError;

/// Retry and timeout settings
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Deadline for a single attempt
    pub timeout: Duration,

    /// Additional attempts after the first failure
    pub retry_count: u32,

    /// Base delay, doubled after every failed attempt
    pub retry_delay: Duration,

    /// Upper bound for a single backoff delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_count: 3,
            retry_delay: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Check the policy bounds
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.timeout < Duration::from_secs(1) {
            return Err(ClientError::InvalidArgument(
                "timeout must be at least 1s".into(),
            ));
        }
        if self.retry_count > 10 {
            return Err(ClientError::InvalidArgument(
                "retry count must be between 0 and 10".into(),
            ));
        }
        if self.retry_delay < Duration::from_millis(100) {
            return Err(ClientError::InvalidArgument(
                "retry delay must be at least 100ms".into(),
            ));
        }
        Ok(())
    }

    /// Delay before the retry that follows failed attempt number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.retry_delay
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Run `operation` with a per-attempt deadline and exponential-backoff retries.
///
/// Only errors for which [`ClientError::is_retryable`] holds are retried.
/// Cancelling `cancel` aborts the current attempt or backoff immediately.
pub async fn with_timeout<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            r = tokio::time::timeout(policy.timeout, operation()) => {
                r.unwrap_or(Err(ClientError::Timeout(policy.timeout)))
            }
        };

        let err = match result {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        if !err.is_retryable() || attempt >= policy.retry_count {
            return Err(err);
        }

        let delay = policy.backoff(attempt);
        attempt += 1;
        warn!(
            attempt,
            max = policy.retry_count,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "operation failed, retrying"
        );

        tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
        debug!(attempt, "retrying operation");
    }
}
