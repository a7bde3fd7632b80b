//! Multi-row INSERT construction for alien rows.

use bench_core::{PrimaryKey, RowBatch, BASE_COLUMNS, ID_COLUMN};
use mysql_async::Value;

/// Columns written per row under `primary_key`.
///
/// The id column is supplied by the client only under
/// [`PrimaryKey::Supplied`]; the other strategies leave it to the server or
/// omit it entirely.
pub(crate) fn insert_columns(primary_key: PrimaryKey) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = BASE_COLUMNS.to_vec();
    if primary_key == PrimaryKey::Supplied {
        columns.push(ID_COLUMN);
    }
    columns
}

/// Build one INSERT statement with placeholders covering `row_count` rows.
pub(crate) fn build_insert_sql(table: &str, columns: &[&str], row_count: usize) -> String {
    let col_placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();
    let row_template = format!("({})", col_placeholders.join(", "));
    let rows_template: Vec<&str> = (0..row_count).map(|_| row_template.as_str()).collect();

    format!(
        "INSERT INTO `{}` ({}) VALUES {}",
        table,
        columns
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", "),
        rows_template.join(", ")
    )
}

/// Flatten `batch` into positional parameters matching the column order of
/// [`build_insert_sql`].
pub(crate) fn batch_params(batch: &RowBatch, primary_key: PrimaryKey) -> Vec<Value> {
    let supplied = primary_key == PrimaryKey::Supplied;
    let per_row = BASE_COLUMNS.len() + usize::from(supplied);
    let mut params: Vec<Value> = Vec::with_capacity(batch.len() * per_row);

    for alien in batch {
        params.push(alien.system.as_str().into());
        params.push(alien.planet.as_str().into());
        params.push(alien.species.as_str().into());
        params.push(alien.age.into());
        params.push(alien.weight.into());
        params.push(alien.height.into());
        if supplied {
            params.push(alien.id.into());
        }
    }

    params
}
