use crate::error::Result;
use crate::models::GroceryItem;
use crate::table::{Record, SaveOutcome, Table};

use super::{add_quantities, reported};

pub const FILE_NAME: &str = "grocery.csv";

const QUANTITY_COLUMN: usize = 2;

#[derive(Debug)]
pub struct GroceryRepo {
    table: Table,
}

impl GroceryRepo {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn load_all(&self) -> Result<Vec<GroceryItem>> {
        self.table.load()
    }

    pub fn find_by(&self, pred: impl Fn(&GroceryItem) -> bool) -> Result<GroceryItem> {
        Ok(self.table.find(pred)?.unwrap_or_default())
    }

    pub fn find_by_id(&self, id: i64) -> Result<GroceryItem> {
        if id <= 0 {
            return Ok(GroceryItem::default());
        }
        self.find_by(|g| g.id == id)
    }

    /// Lookup by case-insensitive name and exact (trimmed) unit.
    pub fn find_by_name_and_unit(&self, name: &str, unit: &str) -> Result<GroceryItem> {
        let key = GroceryItem::new(name, "", unit).key();
        self.find_by(|g| g.key() == key)
    }

    /// Add `item`, or add its quantity onto the stored item with the same
    /// name and unit. A different unit always yields a separate row.
    pub fn save(&self, item: GroceryItem) -> Result<SaveOutcome<GroceryItem>> {
        let key = item.key();
        let result = self.table.read_all().and_then(|rows| {
            self.table.upsert(
                rows,
                item,
                |g: &GroceryItem| g.key() == key,
                |existing, incoming| GroceryItem {
                    quantity: add_quantities(&existing.quantity, &incoming.quantity),
                    ..existing.clone()
                },
            )
        });
        let outcome = reported(&self.table, "save grocery item", result)?;

        match &outcome {
            SaveOutcome::Inserted(g) => self.table.emit(&format!(
                "Added to grocery list: '{}' ({} {})",
                g.name, g.quantity, g.unit
            )),
            SaveOutcome::Updated { after, .. } => self.table.emit(&format!(
                "Updated grocery item '{}' to {} {}",
                after.name, after.quantity, after.unit
            )),
        }
        Ok(outcome)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = self.table.delete_by_id(id, GroceryItem::COLUMNS);
        reported(&self.table, "remove grocery item", result)
    }

    pub fn update_quantity_by_id(&self, id: i64, quantity: &str) -> Result<bool> {
        let result = self.table.update_column(id, QUANTITY_COLUMN, quantity);
        reported(&self.table, "update grocery item", result)
    }

    pub fn clear_all(&self) -> Result<()> {
        let result = self.table.write_all(&[]);
        reported(&self.table, "clear grocery list", result)
    }
}
