use serde::Serialize;

use crate::line_codec::Row;
use crate::numeric::lenient_id;
use crate::table::Record;
use crate::token::{IngredientToken, decode_list, encode_list};

/// Days a weekly plan is laid out over, in order.
pub const WEEK_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub ingredients: Vec<IngredientToken>,
    pub instructions: String,
}

impl Recipe {
    pub fn new(
        name: impl Into<String>,
        ingredients: Vec<IngredientToken>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            ingredients,
            instructions: instructions.into(),
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id > 0
    }
}

impl Record for Recipe {
    const COLUMNS: usize = 4;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.name.clone(),
            encode_list(&self.ingredients),
            self.instructions.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < Self::COLUMNS {
            return None;
        }
        Some(Recipe {
            id: lenient_id(&row[0]),
            name: row[1].clone(),
            ingredients: decode_list(&row[2]),
            instructions: row[3].clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl PantryItem {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id > 0
    }

    /// Pantry items merge on name alone; the unit is not part of the key.
    #[must_use]
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroceryItem {
    pub id: i64,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl GroceryItem {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            quantity: quantity.into(),
            unit: unit.into(),
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id > 0
    }

    /// Grocery items merge on name and unit, unlike pantry items.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (normalize_name(&self.name), self.unit.trim().to_string())
    }
}

// Pantry and grocery rows share the `id,name,quantity,unit` shape.
macro_rules! quantity_record {
    ($ty:ident) => {
        impl Record for $ty {
            const COLUMNS: usize = 4;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }

            fn to_row(&self) -> Row {
                vec![
                    self.id.to_string(),
                    self.name.clone(),
                    self.quantity.clone(),
                    self.unit.clone(),
                ]
            }

            fn from_row(row: &[String]) -> Option<Self> {
                if row.len() < Self::COLUMNS {
                    return None;
                }
                Some($ty {
                    id: lenient_id(&row[0]),
                    name: row[1].clone(),
                    quantity: row[2].clone(),
                    unit: row[3].clone(),
                })
            }
        }
    };
}

quantity_record!(PantryItem);
quantity_record!(GroceryItem);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MealPlanEntry {
    pub id: i64,
    pub week: String,
    pub day: String,
    pub recipe_id: i64,
    /// Copy of the recipe name at planning time.
    pub recipe_name: String,
}

impl MealPlanEntry {
    pub fn new(
        week: impl Into<String>,
        day: impl Into<String>,
        recipe_id: i64,
        recipe_name: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            week: week.into(),
            day: day.into(),
            recipe_id,
            recipe_name: recipe_name.into(),
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id > 0
    }

    #[must_use]
    pub fn slot(&self) -> (&str, &str) {
        (&self.week, &self.day)
    }
}

impl Record for MealPlanEntry {
    const COLUMNS: usize = 5;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn to_row(&self) -> Row {
        vec![
            self.id.to_string(),
            self.week.clone(),
            self.day.clone(),
            self.recipe_id.to_string(),
            self.recipe_name.clone(),
        ]
    }

    // Rows written before the cached name existed have four columns.
    fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < Self::COLUMNS - 1 {
            return None;
        }
        Some(MealPlanEntry {
            id: lenient_id(&row[0]),
            week: row[1].clone(),
            day: row[2].clone(),
            recipe_id: lenient_id(&row[3]),
            recipe_name: row.get(4).cloned().unwrap_or_default(),
        })
    }
}

/// Case- and whitespace-insensitive form of an item name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub merged: usize,
}
