//! Result alias and free retry helpers.
//!
//! The HTTP client has its own retry loop wired to the configured policy;
//! the helpers here exist for callers composing their own operations (and
//! for the telemetry path, which retries locally before giving up).

use super::MetiganError;
use std::time::Duration;

/// Result type alias for Metigan operations.
pub type MetiganResult<T> = Result<T, MetiganError>;

/// Execute an async operation with exponential backoff.
///
/// Non-retryable errors are returned immediately. Retryable errors are
/// reattempted up to `max_attempts` total tries, doubling the delay each
/// time up to `max_delay`. Errors that carry their own wait hint
/// ([`MetiganError::retry_after`]) have that hint honored instead.
///
/// # Examples
///
/// ```rust
/// use metigan::error::{retry_with_backoff, MetiganResult};
/// use std::time::Duration;
///
/// # async fn example() -> MetiganResult<&'static str> {
/// let value = retry_with_backoff(3, Duration::from_millis(100), Duration::from_secs(10), || async {
///     Ok("done")
/// })
/// .await?;
/// # Ok(value)
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T>(
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    mut operation: F,
) -> MetiganResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = MetiganResult<T>>,
{
    let mut attempt = 0;
    let mut delay = initial_delay;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !error.is_retryable() || attempt >= max_attempts {
                    return Err(error);
                }

                let wait = error.retry_after().unwrap_or_else(|| delay.min(max_delay));
                tokio::time::sleep(wait).await;
                delay = (delay * 2).min(max_delay);
            }
        }
    }
}

/// Like [`retry_with_backoff`], with ±25 % jitter on each wait to avoid
/// thundering-herd retries from many clients at once.
pub async fn retry_with_jitter<F, Fut, T>(
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    mut operation: F,
) -> MetiganResult<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = MetiganResult<T>>,
{
    use rand::Rng;

    let mut attempt = 0;
    let mut delay = initial_delay;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !error.is_retryable() || attempt >= max_attempts {
                    return Err(error);
                }

                let base = error.retry_after().unwrap_or_else(|| delay.min(max_delay));
                let factor = rand::thread_rng().gen_range(0.75..=1.25);
                let wait = Duration::from_millis((base.as_millis() as f64 * factor) as u64);
                tokio::time::sleep(wait).await;
                delay = (delay * 2).min(max_delay);
            }
        }
    }
}
