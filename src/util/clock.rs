//! Wall-clock helpers shared by the scheduler and the API layer.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the UNIX epoch.
///
/// Clocks set before the epoch report `0` rather than failing.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Convert a duration to seconds rounded to two decimal places.
pub fn round_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

/// Seconds (two decimals) between `since_ms` and `now_ms`, saturating at zero.
#[allow(clippy::cast_possible_truncation)]
pub fn secs_between(since_ms: u128, now_ms: u128) -> f64 {
    let millis = now_ms.saturating_sub(since_ms).min(u128::from(u64::MAX)) as u64;
    round_secs(Duration::from_millis(millis))
}
