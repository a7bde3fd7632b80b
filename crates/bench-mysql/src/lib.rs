//! MySQL binding for the insert-bench pipeline.
//!
//! [`MysqlStore`] implements the pipeline's [`SchemaManager`] and
//! [`UnitWriter`] seams on top of `mysql_async`: DDL runs on pooled
//! connections, and each commit unit becomes one transaction of multi-row
//! INSERT statements.
//!
//! [`SchemaManager`]: bench_pipeline::SchemaManager
//! [`UnitWriter`]: bench_pipeline::UnitWriter

pub mod client;
pub mod error;
mod insert;
mod schema;
pub mod store;

pub use client::new_mysql_pool;
pub use error::MysqlStoreError;
pub use store::MysqlStore;
