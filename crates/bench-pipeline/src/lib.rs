//! Concurrent batch-loading pipeline for insert-bench.
//!
//! The pipeline turns a seeded entity sequence into transactional multi-row
//! inserts executed by a fixed pool of writer workers:
//!
//! ```text
//! AlienGenerator --> commit_units --> dispatch queue --> writer pool --> UnitWriter
//!  (lazy, seeded)    (row batches      (bounded mpsc,     (N workers      (one transaction
//!                     grouped into      Work | Shutdown)   sharing a       per commit unit)
//!                     commit units)                        LoadCounter)
//! ```
//!
//! The [`Coordinator`] owns one run end to end: schema steps, worker
//! lifecycle, and the final inserted-row count. Storage access goes through
//! the [`SchemaManager`] and [`UnitWriter`] seams so the pipeline itself
//! stays free of any client library.

pub mod batcher;
pub mod coordinator;
pub mod counter;
pub mod error;
pub mod queue;
pub mod rate;
pub mod store;
mod worker;

pub use batcher::{commit_units, CommitUnits};
pub use coordinator::Coordinator;
pub use counter::LoadCounter;
pub use error::PipelineError;
pub use queue::{unit_channel, UnitMessage, UnitReceiver, UnitSender};
pub use rate::{measured, rate_per_second};
pub use store::{SchemaManager, UnitWriter};
