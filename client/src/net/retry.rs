//! Bounded retry for idempotent requests.
//!
//! DESIGN
//! ======
//! Attempts run strictly one after another. After a retryable failure on
//! attempt `n` the caller waits `delay * n` before trying again (linear, no
//! jitter, no cap). Non-retryable failures and the last attempt's failure are
//! returned as-is. There is no cancellation: once started, a retry loop runs
//! to completion.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;
use std::time::Duration;

use super::error::{StatusError, is_retryable_error};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, delay: DEFAULT_RETRY_DELAY }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Wait after failed attempt `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.delay.saturating_mul(attempt)
    }
}

/// Run `request` under `policy`, sleeping on the tokio timer between attempts.
///
/// # Errors
///
/// Returns the first non-retryable error, or the error of the final attempt.
pub async fn retry_request<T, E, F, Fut>(policy: RetryPolicy, request: F) -> Result<T, E>
where
    E: StatusError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_request_with(policy, request, tokio::time::sleep).await
}

/// Same as [`retry_request`] with a caller-supplied sleep.
///
/// # Errors
///
/// Returns the first non-retryable error, or the error of the final attempt.
pub async fn retry_request_with<T, E, F, Fut, S, SFut>(policy: RetryPolicy, mut request: F, mut sleep: S) -> Result<T, E>
where
    E: StatusError,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match request().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retryable_error(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let wait = policy.delay_for_attempt(attempt);
                tracing::debug!(attempt, max_attempts, wait_ms = wait.as_millis(), "retrying request");
                sleep(wait).await;
                attempt += 1;
            }
        }
    }
}
