//! Benchmark report types.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use bench_core::RunConfig;
use bench_pipeline::rate_per_second;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    /// Human-readable run parameters.
    pub run: String,
    /// Rows the run was asked to insert.
    pub rows_requested: u64,
    /// Rows actually committed.
    pub rows_inserted: u64,
    /// Wall-clock duration of the whole run in milliseconds.
    pub duration_ms: u64,
    /// Insert throughput over the whole run.
    pub rows_per_second: f64,
    /// Completion status.
    pub status: RunStatus,
    /// Error message for failed runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Completion status of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

impl RunOutcome {
    /// Outcome of a completed run.
    pub fn completed(config: &RunConfig, rows_inserted: u64, elapsed: Duration) -> Self {
        Self {
            run: config.describe(),
            rows_requested: config.input_size,
            rows_inserted,
            duration_ms: elapsed.as_millis() as u64,
            rows_per_second: rate_per_second(rows_inserted, elapsed),
            status: RunStatus::Completed,
            error: None,
        }
    }

    /// Outcome of a failed run.
    pub fn failed(config: &RunConfig, elapsed: Duration, error: &anyhow::Error) -> Self {
        Self {
            run: config.describe(),
            rows_requested: config.input_size,
            rows_inserted: 0,
            duration_ms: elapsed.as_millis() as u64,
            rows_per_second: 0.0,
            status: RunStatus::Failed,
            error: Some(format!("{error:#}")),
        }
    }
}

/// Aggregated outcomes of a sweep, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// When the sweep started.
    pub started_at: DateTime<Utc>,
    /// Seed shared by every run.
    pub seed: u64,
    /// Per-run outcomes.
    pub runs: Vec<RunOutcome>,
}

impl SweepReport {
    /// Create an empty report.
    pub fn new(seed: u64) -> Self {
        Self {
            started_at: Utc::now(),
            seed,
            runs: Vec::new(),
        }
    }

    /// Record one run's outcome.
    pub fn push(&mut self, outcome: RunOutcome) {
        self.runs.push(outcome);
    }

    /// Number of failed runs.
    pub fn failed_runs(&self) -> usize {
        self.runs
            .iter()
            .filter(|outcome| outcome.status == RunStatus::Failed)
            .count()
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Insert Benchmark Report\n\
             =======================\n\
             Started: {}\n\
             Seed: {}\n\
             Runs: {} ({} failed)\n\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.seed,
            self.runs.len(),
            self.failed_runs()
        );

        for outcome in &self.runs {
            match outcome.status {
                RunStatus::Completed => summary.push_str(&format!(
                    "- {}: {} rows in {}ms ({:.2} rows/sec)\n",
                    outcome.run,
                    outcome.rows_inserted,
                    outcome.duration_ms,
                    outcome.rows_per_second
                )),
                RunStatus::Failed => summary.push_str(&format!(
                    "- {}: FAILED after {}ms: {}\n",
                    outcome.run,
                    outcome.duration_ms,
                    outcome.error.as_deref().unwrap_or("unknown error")
                )),
            }
        }

        summary
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report to {path:?}"))?;
        Ok(())
    }
}
