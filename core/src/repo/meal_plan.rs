use crate::error::Result;
use crate::models::MealPlanEntry;
use crate::table::{Record, SaveOutcome, Table};

use super::reported;

pub const FILE_NAME: &str = "mealplan.csv";

const WEEK_COLUMN: usize = 1;

#[derive(Debug)]
pub struct MealPlanRepo {
    table: Table,
}

impl MealPlanRepo {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn load_all(&self) -> Result<Vec<MealPlanEntry>> {
        self.table.load()
    }

    pub fn find_by(&self, pred: impl Fn(&MealPlanEntry) -> bool) -> Result<MealPlanEntry> {
        Ok(self.table.find(pred)?.unwrap_or_default())
    }

    pub fn find_by_week(&self, week: &str) -> Result<Vec<MealPlanEntry>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|m| m.week == week)
            .collect())
    }

    /// Store `entry` in its week/day slot. An existing entry for the slot is
    /// overwritten in place and keeps its id; nothing is merged.
    pub fn save(&self, entry: MealPlanEntry) -> Result<SaveOutcome<MealPlanEntry>> {
        let (week, day) = (entry.week.clone(), entry.day.clone());
        let result = self.table.read_all().and_then(|rows| {
            self.table.upsert(
                rows,
                entry,
                |m: &MealPlanEntry| m.slot() == (week.as_str(), day.as_str()),
                |_, incoming| incoming.clone(),
            )
        });
        let outcome = reported(&self.table, "save meal plan", result)?;

        let saved = outcome.record();
        self.table.emit(&format!(
            "Saved meal plan for {} - {}: {}",
            saved.week, saved.day, saved.recipe_name
        ));
        Ok(outcome)
    }

    /// Remove every entry of `week`. Returns how many were removed.
    pub fn clear_week(&self, week: &str) -> Result<usize> {
        let result = self
            .table
            .retain(|row| row.get(WEEK_COLUMN).is_none_or(|w| w != week));
        reported(&self.table, "clear meal plan", result)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        // Four-column rows from before the cached name still count.
        let result = self.table.delete_by_id(id, MealPlanEntry::COLUMNS - 1);
        reported(&self.table, "delete meal plan entry", result)
    }
}
