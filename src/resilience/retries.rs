//! Retry logic for idempotent backend reads.
//!
//! # Design Decisions
//! - Only reads go through `retry_read`; a save is never retried, so one save
//!   produces exactly one write request
//! - Transport errors and 5xx are retryable, everything else fails fast

use std::future::Future;

use crate::api::types::{ApiError, ApiResult};
use crate::config::RetryConfig;
use crate::resilience::backoff::backoff_for;

/// Number of attempts `config` allows, never less than one.
pub fn max_attempts(config: &RetryConfig) -> u32 {
    if config.enabled {
        config.max_attempts.max(1)
    } else {
        1
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
pub async fn retry_read<T, F, Fut>(config: &RetryConfig, operation: &str, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let attempts = max_attempts(config);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < attempts && e.is_retryable() => {
                let delay = backoff_for(config, attempt);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Retrying read"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
