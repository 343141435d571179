//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Delay before retry number `attempt` (1-based; 0 means no wait).
///
/// Doubles from `base_ms`, caps at `max_ms`, then adds up to 10% jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let factor = 2u64.saturating_pow(attempt - 1);
    let capped = base_ms.saturating_mul(factor).min(max_ms);

    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped + jitter)
}

/// Backoff for `attempt` using the configured bounds.
pub fn backoff_for(config: &RetryConfig, attempt: u32) -> Duration {
    calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms)
}
