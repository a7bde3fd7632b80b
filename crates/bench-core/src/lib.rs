//! Core types shared across the insert-bench pipeline.
//!
//! This crate holds the data model of a benchmark run: the synthetic
//! [`Alien`] entity, the [`RowBatch`]/[`CommitUnit`] grouping types, and the
//! immutable [`RunConfig`] that fully determines the pipeline shape. It has
//! no I/O and no async code; the pipeline and the store bindings build on it.

pub mod config;
pub mod record;

pub use config::{ConfigError, ErrorPolicy, IndexTiming, PrimaryKey, RunConfig};
pub use record::{
    unit_rows, Alien, CommitUnit, RowBatch, BASE_COLUMNS, DEFAULT_TABLE, ID_COLUMN, INDEX_COLUMNS,
};
