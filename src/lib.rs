//! insert-bench library surface.
//!
//! The binary wires these modules together: [`args`] defines the CLI,
//! [`sweep`] expands and executes benchmark runs, and [`report`] collects
//! per-run outcomes for the final summary and the optional JSON export.

pub mod args;
pub mod report;
pub mod sweep;
