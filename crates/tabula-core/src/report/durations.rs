//! Slow-test selection for the duration report.

use std::time::Duration;

/// Tests listed at normal verbosity.
pub const SLOWEST_NORMAL: usize = 10;

/// Tests listed when running verbosely.
pub const SLOWEST_VERBOSE: usize = 100;

/// How many of `total` timed tests the report lists at `verbosity`.
pub fn amount_to_print(total: usize, verbosity: u8) -> usize {
    let max_to_print = if verbosity > 1 {
        SLOWEST_VERBOSE
    } else {
        SLOWEST_NORMAL
    };
    total.min(max_to_print)
}

/// The slowest tests first, ties in the order they finished.
pub fn slowest(durations: &[(String, Duration)], verbosity: u8) -> Vec<&(String, Duration)> {
    let mut by_time: Vec<&(String, Duration)> = durations.iter().collect();
    by_time.sort_by(|a, b| b.1.cmp(&a.1));
    by_time.truncate(amount_to_print(durations.len(), verbosity));
    by_time
}

/// Seconds with millisecond precision, e.g. `0.250s`.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}
