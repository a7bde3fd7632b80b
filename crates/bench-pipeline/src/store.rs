//! Storage seams of the pipeline.
//!
//! The pipeline talks to the target database through two narrow traits so
//! the batching and worker machinery stays free of any client library.
//! Implementations live in their own crates; the [`Coordinator`] takes them
//! as generics, so dispatch is static:
//!
//! ```ignore
//! let store = Arc::new(MysqlStore::new(pool, config.primary_key));
//! let coordinator = Coordinator::new(config, Arc::clone(&store), store);
//! let inserted = coordinator.run().await?;
//! ```
//!
//! [`Coordinator`]: crate::Coordinator

use anyhow::Result;
use bench_core::{CommitUnit, PrimaryKey};

/// Schema-side collaborator: owns the shape of the target table.
///
/// Every method returns the affected-row count reported by the server so
/// the coordinator can rate-log each step uniformly.
#[async_trait::async_trait]
pub trait SchemaManager: Send + Sync {
    /// Drop the target table if it exists and create it fresh.
    async fn reset_table(&self) -> Result<u64>;

    /// Add the secondary index over `columns`.
    async fn add_index(&self, columns: &[&str]) -> Result<u64>;

    /// Add the primary-key column for `strategy`.
    ///
    /// [`PrimaryKey::None`] is a no-op returning 0.
    async fn add_primary_key(&self, strategy: PrimaryKey) -> Result<u64>;
}

/// Write-side collaborator: persists one commit unit per call.
#[async_trait::async_trait]
pub trait UnitWriter: Send + Sync {
    /// Write every row batch of `unit` inside a single transaction.
    ///
    /// Returns the number of rows committed. On the first failing batch the
    /// transaction is rolled back, the remaining batches are not attempted,
    /// and the error is returned: the unit succeeds or fails as a whole.
    async fn write_unit(&self, unit: &CommitUnit) -> Result<u64>;
}
