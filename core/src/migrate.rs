//! Upgrades tables whose rows predate the id column.
//!
//! A legacy row is the current shape minus the leading id. When any row in a
//! table has exactly the legacy width, the whole file is rewritten: every row
//! gets a fresh id `1..N` in file order, legacy rows are shifted right by one
//! column, and short rows are padded with empty fields. Once rewritten no row
//! has the legacy width, so running the check again changes nothing.

use tracing::info;

use crate::error::Result;
use crate::line_codec::Row;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowShape {
    /// Width of the current shape, id column included.
    pub current: usize,
    /// Width of the legacy shape, which has no id column.
    pub legacy: usize,
}

impl RowShape {
    #[must_use]
    pub const fn with_id_added(current: usize) -> Self {
        Self {
            current,
            legacy: current - 1,
        }
    }

    #[must_use]
    pub fn needs_migration(&self, rows: &[Row]) -> bool {
        rows.iter().any(|r| r.len() == self.legacy)
    }

    /// Rewrite `rows` into the current shape with ids `1..N`.
    #[must_use]
    pub fn upgrade(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter()
            .zip(1_i64..)
            .map(|(row, id)| {
                let fields: &[String] = if row.len() >= self.current {
                    &row[1..]
                } else {
                    row
                };
                let mut upgraded = Vec::with_capacity(self.current.max(fields.len() + 1));
                upgraded.push(id.to_string());
                upgraded.extend(fields.iter().cloned());
                if upgraded.len() < self.current {
                    upgraded.resize(self.current, String::new());
                }
                upgraded
            })
            .collect()
    }
}

/// Read `table`, upgrading and persisting it first when it holds legacy rows.
/// Returns the rows in their current shape.
pub fn read_migrated(table: &Table, shape: RowShape) -> Result<Vec<Row>> {
    let rows = table.read_all()?;
    if !shape.needs_migration(&rows) {
        return Ok(rows);
    }
    let upgraded = shape.upgrade(&rows);
    table.write_all(&upgraded)?;
    info!(path = %table.path().display(), rows = upgraded.len(), "migrated legacy rows");
    table.emit(&format!(
        "Migrated {} to include ids ({} rows)",
        table.path().display(),
        upgraded.len()
    ));
    Ok(upgraded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SilentSink;
    use std::fs;
    use std::rc::Rc;

    const SHAPE: RowShape = RowShape::with_id_added(4);

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_detects_legacy_width_only() {
        assert!(SHAPE.needs_migration(&[row(&["1", "a", "b", "c"]), row(&["a", "b", "c"])]));
        assert!(!SHAPE.needs_migration(&[row(&["1", "a", "b", "c"])]));
        assert!(!SHAPE.needs_migration(&[row(&["a", "b"])]));
        assert!(!SHAPE.needs_migration(&[]));
    }

    #[test]
    fn test_upgrade_assigns_ids_in_file_order() {
        let upgraded = SHAPE.upgrade(&[
            row(&["Soup", "water", "Boil"]),
            row(&["Toast", "bread", "Heat"]),
        ]);
        assert_eq!(
            upgraded,
            vec![
                row(&["1", "Soup", "water", "Boil"]),
                row(&["2", "Toast", "bread", "Heat"]),
            ]
        );
    }

    #[test]
    fn test_upgrade_mixed_and_short_rows() {
        let upgraded = SHAPE.upgrade(&[
            row(&["9", "Stew", "beef", "Simmer"]),
            row(&["Salad", "greens", "Toss"]),
            row(&["Tea"]),
        ]);
        assert_eq!(
            upgraded,
            vec![
                row(&["1", "Stew", "beef", "Simmer"]),
                row(&["2", "Salad", "greens", "Toss"]),
                row(&["3", "Tea", "", ""]),
            ]
        );
    }

    #[test]
    fn test_migration_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::new(dir.path().join("recipes.csv"), Rc::new(SilentSink));
        table.ensure_exists().unwrap();
        fs::write(
            table.path(),
            "Soup,\"water;salt|1|tsp\",Boil\nToast,bread,\"Heat, then butter\"\n",
        )
        .unwrap();

        let first = read_migrated(&table, SHAPE).unwrap();
        let after_first = fs::read(table.path()).unwrap();
        let second = read_migrated(&table, SHAPE).unwrap();
        let after_second = fs::read(table.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(after_first, after_second);
        assert_eq!(first[1], row(&["2", "Toast", "bread", "Heat, then butter"]));
    }
}
