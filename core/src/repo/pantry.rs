use crate::error::Result;
use crate::models::{PantryItem, normalize_name};
use crate::table::{Record, SaveOutcome, Table};

use super::{add_quantities, reported};

pub const FILE_NAME: &str = "pantry.csv";

const QUANTITY_COLUMN: usize = 2;

#[derive(Debug)]
pub struct PantryRepo {
    table: Table,
}

impl PantryRepo {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn load_all(&self) -> Result<Vec<PantryItem>> {
        self.table.load()
    }

    /// First item matching `pred`, or the zero-value item (`id == 0`).
    pub fn find_by(&self, pred: impl Fn(&PantryItem) -> bool) -> Result<PantryItem> {
        Ok(self.table.find(pred)?.unwrap_or_default())
    }

    pub fn find_by_id(&self, id: i64) -> Result<PantryItem> {
        if id <= 0 {
            return Ok(PantryItem::default());
        }
        self.find_by(|p| p.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> Result<PantryItem> {
        let key = normalize_name(name);
        self.find_by(|p| p.key() == key)
    }

    /// Add `item`, or add its quantity onto the item already stored under the
    /// same name. The stored item keeps its id, name and unit even when the
    /// incoming unit differs.
    pub fn save(&self, item: PantryItem) -> Result<SaveOutcome<PantryItem>> {
        let key = item.key();
        let result = self.table.read_all().and_then(|rows| {
            self.table.upsert(
                rows,
                item,
                |p: &PantryItem| p.key() == key,
                |existing, incoming| PantryItem {
                    quantity: add_quantities(&existing.quantity, &incoming.quantity),
                    ..existing.clone()
                },
            )
        });
        let outcome = reported(&self.table, "save ingredient", result)?;

        match &outcome {
            SaveOutcome::Inserted(p) => {
                self.table
                    .emit(&format!("Ingredient '{}' added successfully!", p.name));
            }
            SaveOutcome::Updated { before, after } => {
                self.table
                    .emit(&format!("Ingredient '{}' already exists!", after.name));
                self.table.emit(&format!(
                    "Updated quantity from {} {} to {} {}",
                    before.quantity, before.unit, after.quantity, after.unit
                ));
            }
        }
        Ok(outcome)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = self.table.delete_by_id(id, PantryItem::COLUMNS);
        reported(&self.table, "delete ingredient", result)
    }

    pub fn update_quantity_by_id(&self, id: i64, quantity: &str) -> Result<bool> {
        let result = self.table.update_column(id, QUANTITY_COLUMN, quantity);
        reported(&self.table, "update ingredient", result)
    }
}
