//! One repository per entity table. Each call loads a full snapshot of its
//! file, computes, and writes the full snapshot back; nothing is cached
//! between calls.

pub mod grocery;
pub mod meal_plan;
pub mod pantry;
pub mod recipes;

pub use grocery::GroceryRepo;
pub use meal_plan::MealPlanRepo;
pub use pantry::PantryRepo;
pub use recipes::RecipeRepo;

use crate::error::Result;
use crate::numeric::{format_quantity, lenient_amount};
use crate::table::Table;

/// Pass `result` through, announcing a failure on the table's status sink.
fn reported<T>(table: &Table, action: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        table.emit(&format!("Error: Could not {action}: {e}"));
    }
    result
}

/// Sum two quantity texts numerically; unparsable sides count as zero.
fn add_quantities(a: &str, b: &str) -> String {
    format_quantity(lenient_amount(a) + lenient_amount(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_quantities() {
        assert_eq!(add_quantities("1", "2"), "3");
        assert_eq!(add_quantities("1.5", "abc"), "1.5");
        assert_eq!(add_quantities("", ""), "0");
    }
}
