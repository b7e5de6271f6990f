// Parlant Widget Core — Poll Retry Backoff
//
// Delay policy for failed poll cycles: capped exponential growth with ±25%
// jitter. Jitter comes from system clock nanos — enough to spread retries
// across widget instances without pulling in a rand crate.

use std::time::{Duration, SystemTime};

use crate::config::BackoffConfig;

/// Floor applied to every computed delay.
const MIN_DELAY_MS: u64 = 100;

/// Exponent cap so `2^attempt` cannot overflow on long outages.
const MAX_EXPONENT: u32 = 12;

/// Compute the delay before retry number `attempt` (0-based). The caller
/// sleeps; this function only does arithmetic so it stays trivially
/// testable.
pub fn delay_for_attempt(config: &BackoffConfig, attempt: u32) -> Duration {
    let base_ms = config
        .initial_delay_ms
        .saturating_mul(2u64.saturating_pow(attempt.min(MAX_EXPONENT)));
    let capped_ms = base_ms.min(config.max_delay_ms);
    Duration::from_millis(apply_jitter(capped_ms))
}

/// Apply ±25% jitter to prevent thundering-herd effects.
fn apply_jitter(base_ms: u64) -> u64 {
    let jitter_range = (base_ms / 4) as i64;
    if jitter_range == 0 {
        return base_ms.max(MIN_DELAY_MS);
    }
    let offset = (clock_jitter() % (2 * jitter_range + 1)) - jitter_range;
    let result = base_ms as i64 + offset;
    result.max(MIN_DELAY_MS as i64) as u64
}

/// Simple jitter source using system clock nanos (no extra crate needed).
fn clock_jitter() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as i64
}
