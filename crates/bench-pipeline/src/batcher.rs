//! Two-level batching of the entity sequence into commit units.

use bench_core::{Alien, CommitUnit, RowBatch};

/// Fold a flat entity sequence into commit units.
///
/// Entities are chunked positionally into row batches of `rows_per_batch`,
/// and row batches into commit units of `batches_per_commit`. The final
/// batch and the final unit may be short; no entity is dropped, duplicated,
/// or reordered. The adapter is lazy: a commit unit is materialized only
/// when the consumer asks for it, so the source sequence is never collected
/// whole.
///
/// # Panics
///
/// Panics when `rows_per_batch` or `batches_per_commit` is zero. Callers
/// going through [`RunConfig::validate`](bench_core::RunConfig::validate)
/// never hit this.
pub fn commit_units<I>(
    entities: I,
    rows_per_batch: usize,
    batches_per_commit: usize,
) -> CommitUnits<I::IntoIter>
where
    I: IntoIterator<Item = Alien>,
{
    assert!(rows_per_batch >= 1, "rows_per_batch must be at least 1");
    assert!(batches_per_commit >= 1, "batches_per_commit must be at least 1");

    CommitUnits {
        entities: entities.into_iter(),
        rows_per_batch,
        batches_per_commit,
    }
}

/// Lazy iterator over commit units. See [`commit_units`].
pub struct CommitUnits<I> {
    entities: I,
    rows_per_batch: usize,
    batches_per_commit: usize,
}

impl<I> Iterator for CommitUnits<I>
where
    I: Iterator<Item = Alien>,
{
    type Item = CommitUnit;

    fn next(&mut self) -> Option<Self::Item> {
        let mut unit: CommitUnit = Vec::with_capacity(self.batches_per_commit);

        'unit: while unit.len() < self.batches_per_commit {
            let mut batch: RowBatch = Vec::with_capacity(self.rows_per_batch);
            while batch.len() < self.rows_per_batch {
                match self.entities.next() {
                    Some(entity) => batch.push(entity),
                    None => {
                        if !batch.is_empty() {
                            unit.push(batch);
                        }
                        break 'unit;
                    }
                }
            }
            unit.push(batch);
        }

        if unit.is_empty() {
            None
        } else {
            Some(unit)
        }
    }
}
