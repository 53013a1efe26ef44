//! Bounded retry and request pacing
//!
//! Two policies live here:
//! - [`retry_any`] retries an async operation on ANY error up to a fixed
//!   number of times, logging each failed attempt. The audio download uses it
//!   with a single retry; exhaustion is the caller's soft-failure signal.
//! - [`pace_delay`] is the randomized suspension inserted between list pages
//!   and before each audio fetch, to avoid tripping upstream rate limiting.

use crate::config::PacingConfig;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Sleep for a random duration inside the configured pacing window
pub async fn pace_delay(config: &PacingConfig) {
    let max = config.max_delay_ms.max(config.min_delay_ms);
    let millis = rand::thread_rng().gen_range(config.min_delay_ms..=max);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

/// Execute an async operation, retrying on any error
///
/// `max_retries` counts retries after the first attempt, so the operation
/// runs at most `max_retries + 1` times. Every failed attempt is logged; the
/// last error is returned once retries are exhausted. There is no delay
/// between attempts.
///
/// # Arguments
///
/// * `max_retries` - Number of retries after the initial attempt
/// * `operation_name` - Short label for log lines
/// * `operation` - Async closure returning `Result<T, E>`
pub async fn retry_any<F, Fut, T, E>(
    max_retries: u32,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!(
                        operation = operation_name,
                        attempts = attempt + 1,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(e) if attempt < max_retries => {
                attempt += 1;
                tracing::warn!(
                    operation = operation_name,
                    error = %e,
                    attempt,
                    max_retries,
                    "Operation failed, retrying"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation = operation_name,
                    error = %e,
                    attempts = attempt + 1,
                    "Operation failed after all attempts"
                );
                return Err(e);
            }
        }
    }
}
