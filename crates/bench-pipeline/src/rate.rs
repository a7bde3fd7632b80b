//! Rate instrumentation for timed pipeline steps.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Throughput of `result` items over `elapsed`.
///
/// Sub-millisecond steps can observe a zero elapsed duration; that reports
/// as 0.0 instead of dividing by zero.
pub fn rate_per_second(result: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        result as f64 / seconds
    } else {
        0.0
    }
}

/// Run `work`, log its elapsed time and throughput under `label`, and pass
/// the outcome through unchanged.
///
/// Failures are logged with their elapsed time and propagated as-is; the
/// wrapper never alters the result of the wrapped step.
pub async fn measured<E, F, Fut>(label: &str, work: F) -> Result<u64, E>
where
    E: std::fmt::Display,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<u64, E>>,
{
    let start = Instant::now();
    let result = work().await;
    let elapsed = start.elapsed();

    match &result {
        Ok(value) => info!(
            "{label}: {value} in {elapsed:?} ({:.2}/sec)",
            rate_per_second(*value, elapsed)
        ),
        Err(e) => warn!("{label}: failed after {elapsed:?}: {e}"),
    }

    result
}
