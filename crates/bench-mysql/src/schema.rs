//! DDL statements for the benchmark table.

use bench_core::PrimaryKey;

/// Generate the DROP TABLE statement.
pub(crate) fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS `{table}`")
}

/// Generate the CREATE TABLE statement.
///
/// The table starts without any index or primary key; those are applied as
/// separate, individually timed steps.
pub(crate) fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE `{table}` (\
         `system` VARCHAR(100) NOT NULL, \
         `planet` VARCHAR(100) NOT NULL, \
         `species` VARCHAR(100) NOT NULL, \
         `age` INT UNSIGNED NOT NULL, \
         `weight` INT UNSIGNED NOT NULL, \
         `height` INT UNSIGNED NOT NULL)"
    )
}

/// Generate the ALTER TABLE statement adding the secondary index.
pub(crate) fn add_index_sql(table: &str, columns: &[&str]) -> String {
    format!(
        "ALTER TABLE `{table}` ADD INDEX ({})",
        columns
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Generate the ALTER TABLE statement adding the id column for `strategy`,
/// or `None` when the strategy needs no statement.
pub(crate) fn add_primary_key_sql(table: &str, strategy: PrimaryKey) -> Option<String> {
    let clause = match strategy {
        PrimaryKey::AutoIncrement => "AUTO_INCREMENT PRIMARY KEY",
        PrimaryKey::Supplied => "PRIMARY KEY",
        PrimaryKey::None => return None,
    };
    Some(format!(
        "ALTER TABLE `{table}` ADD COLUMN `id` BIGINT UNSIGNED NOT NULL {clause}"
    ))
}
