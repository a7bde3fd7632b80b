//! Shared counters for one load run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cloneable handle over the per-run load counters.
///
/// Each worker publishes through its own clone with atomic adds; the
/// coordinator reads the totals after every worker has been joined. The
/// counter is owned by the run that created it, so concurrent runs in one
/// process never share totals.
#[derive(Debug, Clone, Default)]
pub struct LoadCounter {
    rows_inserted: Arc<AtomicU64>,
    units_failed: Arc<AtomicU64>,
}

impl LoadCounter {
    /// Create a fresh counter for one run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record rows committed by one unit.
    pub fn record_inserted(&self, rows: u64) {
        self.rows_inserted.fetch_add(rows, Ordering::Relaxed);
    }

    /// Record a unit whose transaction rolled back.
    pub fn record_unit_failure(&self) {
        self.units_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Total rows committed so far.
    pub fn rows_inserted(&self) -> u64 {
        self.rows_inserted.load(Ordering::Relaxed)
    }

    /// Total commit units rolled back so far.
    pub fn units_failed(&self) -> u64 {
        self.units_failed.load(Ordering::Relaxed)
    }
}
