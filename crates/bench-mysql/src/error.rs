//! Error types for the MySQL store.

use thiserror::Error;

/// Errors raised by the MySQL store.
#[derive(Error, Debug)]
pub enum MysqlStoreError {
    /// MySQL connection or query error.
    #[error("MySQL error: {0}")]
    Mysql(#[from] mysql_async::Error),

    /// A batch insert failed inside a commit unit's transaction.
    #[error("batch of {rows} rows failed: {source}")]
    BatchFailed {
        /// Rows in the failed batch.
        rows: usize,
        #[source]
        source: mysql_async::Error,
    },
}
