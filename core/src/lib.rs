//! Flat-file storage and kitchen workflows for mise.
//!
//! Each entity lives in its own comma-separated file with an integer id in
//! the first column. [`Kitchen`] ties the four tables together.

pub mod error;
pub mod import;
pub mod kitchen;
pub mod line_codec;
pub mod migrate;
pub mod models;
pub mod numeric;
pub mod repo;
pub mod seed;
pub mod status;
pub mod table;
pub mod token;

pub use error::{ImportError, Result, StoreError};
pub use kitchen::{Kitchen, missing_ingredients, shortfall_against};
pub use models::{GroceryItem, ImportSummary, MealPlanEntry, PantryItem, Recipe, WEEK_DAYS};
pub use status::{ConsoleSink, RecordingSink, SilentSink, StatusSink};
pub use table::SaveOutcome;
pub use token::IngredientToken;
