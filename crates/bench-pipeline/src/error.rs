//! Pipeline error types.

/// Failure modes of the pipeline itself.
///
/// Schema and store failures travel as `anyhow` errors from the storage
/// seams; this type covers what the pipeline detects on its own.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The run configuration failed validation.
    #[error("invalid run configuration: {0}")]
    Config(#[from] bench_core::ConfigError),

    /// The run was cancelled before the load completed.
    #[error("run cancelled after {rows_inserted} rows")]
    Cancelled {
        /// Rows committed before the cancellation took effect.
        rows_inserted: u64,
    },
}
