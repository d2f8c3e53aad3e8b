//! Bounded retry with exponential backoff for transient runtime failures.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::domain::{RetryConfig, RuntimeError};

/// Run `op` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have been made.
///
/// Cancelling `cancel` abandons any pending backoff; the call in flight is
/// left to finish.
///
/// # Errors
///
/// Returns the last error observed.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryConfig,
    what: &str,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, RuntimeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RuntimeError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err)
                if err.is_retryable()
                    && attempt < policy.max_attempts
                    && !cancel.is_cancelled() =>
            {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    operation = what,
                    attempt,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "runtime call failed, retrying"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        tracing::debug!(operation = what, attempt, "retry abandoned on cancel");
                        return Err(err);
                    }
                    () = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
            other => return other,
        }
    }
}
