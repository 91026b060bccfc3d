use std::time::Duration;

use tokio_retry::strategy::FixedInterval;

/// Delays between attempts: `retries` extra attempts spaced by `delay`.
pub fn fixed_retries(retries: usize, delay: Duration) -> impl Iterator<Item = Duration> {
    FixedInterval::new(delay).take(retries)
}
