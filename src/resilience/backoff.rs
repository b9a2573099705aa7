//! Exponential backoff with jitter for the poll interval.

use std::time::Duration;
use rand::Rng;

use crate::config::BackoffConfig;

/// Exponential delay for the given failure streak, capped at `max_ms`, plus up to 10% jitter.
pub fn calculate_backoff(failures: u32, base_ms: u64, max_ms: u64) -> Duration {
    if failures == 0 {
        return Duration::ZERO;
    }

    let exponential_base = 2u64.saturating_pow(failures - 1);
    let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Pause before the next poll.
///
/// Without backoff, or without failures, this is exactly `interval`. Backoff never
/// shortens the interval.
pub fn poll_delay(interval: Duration, consecutive_failures: u32, backoff: &BackoffConfig) -> Duration {
    if !backoff.enabled || consecutive_failures == 0 {
        return interval;
    }
    calculate_backoff(consecutive_failures, backoff.base_delay_ms, backoff.max_delay_ms).max(interval)
}
