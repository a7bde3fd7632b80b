//! The synthetic entity loaded into the target table.

/// Default name of the benchmark target table.
pub const DEFAULT_TABLE: &str = "aliens";

/// Columns written under every primary-key strategy, in insert order.
pub const BASE_COLUMNS: &[&str] = &["system", "planet", "species", "age", "weight", "height"];

/// Columns covered by the secondary index.
pub const INDEX_COLUMNS: &[&str] = &["system", "planet", "species"];

/// Identifier column added by the primary-key strategies.
pub const ID_COLUMN: &str = "id";

/// A synthetic entity produced by the record generator.
///
/// Immutable once generated. The identifier is assigned from the generation
/// sequence and is only written to the table under the supplied primary-key
/// strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alien {
    pub id: u64,
    pub system: String,
    pub planet: String,
    pub species: String,
    pub age: u32,
    pub weight: u32,
    pub height: u32,
}

/// An ordered group of entities inserted via one multi-row statement.
pub type RowBatch = Vec<Alien>;

/// An ordered group of row-batches inserted within one transaction.
pub type CommitUnit = Vec<RowBatch>;

/// Total number of rows carried by a commit unit.
pub fn unit_rows(unit: &CommitUnit) -> u64 {
    unit.iter().map(|batch| batch.len() as u64).sum()
}
