//! Run configuration for a single benchmark run.

use serde::{Deserialize, Serialize};

/// Error type for configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The writer pool needs at least one worker.
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    /// A row-batch needs at least one row.
    #[error("rows_per_batch must be at least 1")]
    ZeroRowsPerBatch,

    /// A commit unit needs at least one row-batch.
    #[error("batches_per_commit must be at least 1")]
    ZeroBatchesPerCommit,
}

/// When the secondary index is created relative to the bulk load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexTiming {
    /// Create the index before loading any rows.
    Early,
    /// Create the index after the load completes.
    Late,
}

impl std::fmt::Display for IndexTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexTiming::Early => write!(f, "early"),
            IndexTiming::Late => write!(f, "late"),
        }
    }
}

/// How the primary key of the target table is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimaryKey {
    /// Store-assigned id column, added before the load.
    AutoIncrement,
    /// Client-assigned id column, added before the load and filled from the
    /// entity identifiers.
    Supplied,
    /// No primary key at all.
    None,
}

impl std::fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryKey::AutoIncrement => write!(f, "auto-increment"),
            PrimaryKey::Supplied => write!(f, "supplied"),
            PrimaryKey::None => write!(f, "none"),
        }
    }
}

/// What a failed setup step or commit unit does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Log the failure, count the unit as zero rows, keep going.
    Continue,
    /// Cancel the whole run on the first failure.
    Abort,
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Continue => write!(f, "continue"),
            ErrorPolicy::Abort => write!(f, "abort"),
        }
    }
}

/// Immutable configuration of one benchmark run.
///
/// Fully determines the pipeline shape: how many entities are generated, how
/// they are grouped into row-batches and commit units, how many writers
/// consume them, and how the target table is indexed and keyed. Constructed
/// once per run (or sweep point) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of entities to generate and insert.
    pub input_size: u64,
    /// Number of writer workers.
    pub concurrency: usize,
    /// Row-batches grouped into one transaction.
    pub batches_per_commit: usize,
    /// Entities grouped into one multi-row INSERT.
    pub rows_per_batch: usize,
    /// When the secondary index is created.
    pub index_timing: IndexTiming,
    /// Primary-key strategy for the target table.
    pub primary_key: PrimaryKey,
    /// Behavior on setup or commit-unit failure.
    pub error_policy: ErrorPolicy,
    /// Seed for the record generator.
    pub seed: u64,
}

impl RunConfig {
    /// Check the shape parameters the pipeline depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.rows_per_batch == 0 {
            return Err(ConfigError::ZeroRowsPerBatch);
        }
        if self.batches_per_commit == 0 {
            return Err(ConfigError::ZeroBatchesPerCommit);
        }
        Ok(())
    }

    /// Capacity of the dispatch queue.
    ///
    /// Two units per worker: bounds buffered memory while keeping every
    /// worker fed.
    pub fn queue_capacity(&self) -> usize {
        self.concurrency * 2
    }

    /// Number of commit units the batcher will emit for a validated config.
    pub fn commit_unit_count(&self) -> u64 {
        let batches = self.input_size.div_ceil(self.rows_per_batch as u64);
        batches.div_ceil(self.batches_per_commit as u64)
    }

    /// One-line description used to label every log line of this run.
    pub fn describe(&self) -> String {
        format!(
            "rows={} workers={} rows_per_batch={} batches_per_commit={} index={} pk={} seed={}",
            self.input_size,
            self.concurrency,
            self.rows_per_batch,
            self.batches_per_commit,
            self.index_timing,
            self.primary_key,
            self.seed
        )
    }
}
