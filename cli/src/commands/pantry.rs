use anyhow::{Context, Result, bail};
use std::fs::File;
use std::path::Path;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use mise_core::import::parse_pantry_csv;
use mise_core::{Kitchen, PantryItem};

use super::helpers::{exit_not_found, truncate};

pub(crate) fn cmd_pantry_add(
    kitchen: &Kitchen,
    name: &str,
    quantity: &str,
    unit: &str,
    json: bool,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Ingredient name cannot be empty");
    }
    let outcome = kitchen
        .pantry
        .save(PantryItem::new(name, quantity.trim(), unit.trim()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(outcome.record())?);
    }
    Ok(())
}

pub(crate) fn cmd_pantry_list(kitchen: &Kitchen, json: bool) -> Result<()> {
    let items = kitchen.pantry.load_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        eprintln!("Pantry is empty");
        return Ok(());
    }
    print_quantity_table(
        items
            .iter()
            .map(|p| (p.id, p.name.as_str(), p.quantity.as_str(), p.unit.as_str())),
    );
    Ok(())
}

/// Shared by the pantry and grocery listings, which have the same columns.
pub(super) fn print_quantity_table<'a>(
    items: impl Iterator<Item = (i64, &'a str, &'a str, &'a str)>,
) {
    #[derive(Tabled)]
    struct QuantityRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Quantity")]
        quantity: String,
        #[tabled(rename = "Unit")]
        unit: String,
    }

    let rows: Vec<QuantityRow> = items
        .map(|(id, name, quantity, unit)| QuantityRow {
            id,
            name: truncate(name, 30),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_pantry_update(
    kitchen: &Kitchen,
    id: i64,
    quantity: &str,
    json: bool,
) -> Result<()> {
    if !kitchen.pantry.update_quantity_by_id(id, quantity.trim())? {
        exit_not_found(&format!("Pantry item {id} not found"), json);
    }
    let item = kitchen.pantry.find_by_id(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("Updated {} to {} {}", item.name, item.quantity, item.unit);
    }
    Ok(())
}

pub(crate) fn cmd_pantry_delete(kitchen: &Kitchen, id: i64, json: bool) -> Result<()> {
    if !kitchen.pantry.delete_by_id(id)? {
        exit_not_found(&format!("Pantry item {id} not found"), json);
    }
    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted pantry item {id}");
    }
    Ok(())
}

pub(crate) fn cmd_pantry_import(kitchen: &Kitchen, file: &Path, json: bool) -> Result<()> {
    let reader =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let items = parse_pantry_csv(reader)
        .with_context(|| format!("Failed to parse pantry CSV: {}", file.display()))?;
    if items.is_empty() {
        bail!("No pantry items found in {}", file.display());
    }

    let summary = kitchen.import_pantry(items)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Imported pantry: {} added, {} merged into existing items",
            summary.added, summary.merged
        );
    }
    Ok(())
}
