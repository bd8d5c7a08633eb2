//! Bulk pantry import from a headered CSV file.

use std::io::Read;

use crate::error::ImportError;
use crate::models::PantryItem;

/// Parse `name,quantity,unit` rows from any reader.
///
/// Header names are matched case-insensitively and may appear in any order;
/// only `name` is required. Extra columns are ignored and rows with a blank
/// name are skipped. A missing quantity defaults to `"1"`.
pub fn parse_pantry_csv<R: Read>(reader: R) -> Result<Vec<PantryItem>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(ImportError::Headers)?.clone();
    let col =
        |name: &str| -> Option<usize> { headers.iter().position(|h| h.eq_ignore_ascii_case(name)) };

    let idx_name = col("name").ok_or(ImportError::MissingColumn("name"))?;
    let idx_quantity = col("quantity");
    let idx_unit = col("unit");

    let mut items = Vec::new();
    for (line_num, result) in rdr.records().enumerate() {
        let record = result.map_err(|source| ImportError::Row {
            line: line_num + 2,
            source,
        })?;

        let name = record.get(idx_name).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let quantity = idx_quantity
            .and_then(|i| record.get(i))
            .filter(|q| !q.is_empty())
            .unwrap_or("1");
        let unit = idx_unit.and_then(|i| record.get(i)).unwrap_or("");

        items.push(PantryItem::new(name, quantity, unit));
    }

    Ok(items)
}
