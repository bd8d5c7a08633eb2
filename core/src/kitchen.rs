//! Operations that span more than one table: turning recipes into grocery
//! lists, moving groceries into the pantry, and laying out weekly plans.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::error::Result;
use crate::models::{
    GroceryItem, ImportSummary, MealPlanEntry, PantryItem, Recipe, WEEK_DAYS, normalize_name,
};
use crate::numeric::{format_quantity, lenient_amount};
use crate::repo::{GroceryRepo, MealPlanRepo, PantryRepo, RecipeRepo};
use crate::seed::sample_recipe_rows;
use crate::status::StatusSink;
use crate::table::{SaveOutcome, Table};
use crate::token::IngredientToken;

/// Quantity used when a recipe needs an ingredient without saying how much.
const DEFAULT_QUANTITY: &str = "1";

#[derive(Debug)]
pub struct Kitchen {
    pub recipes: RecipeRepo,
    pub pantry: PantryRepo,
    pub grocery: GroceryRepo,
    pub meal_plan: MealPlanRepo,
    data_dir: PathBuf,
}

impl Kitchen {
    /// Open the four tables under `data_dir`. Files are created lazily on
    /// first access.
    pub fn open(data_dir: &Path, sink: Rc<dyn StatusSink>) -> Self {
        Self::open_with_seed(data_dir, sink, 0)
    }

    /// Like [`Kitchen::open`], but a newly created recipe table starts with
    /// `seed_recipes` sample recipes.
    pub fn open_with_seed(data_dir: &Path, sink: Rc<dyn StatusSink>, seed_recipes: usize) -> Self {
        let table = |file: &str| Table::new(data_dir.join(file), sink.clone());

        let mut recipe_table = table(crate::repo::recipes::FILE_NAME);
        if seed_recipes > 0 {
            recipe_table = recipe_table.with_seeder(move || sample_recipe_rows(seed_recipes));
        }

        Self {
            recipes: RecipeRepo::new(recipe_table),
            pantry: PantryRepo::new(table(crate::repo::pantry::FILE_NAME)),
            grocery: GroceryRepo::new(table(crate::repo::grocery::FILE_NAME)),
            meal_plan: MealPlanRepo::new(table(crate::repo::meal_plan::FILE_NAME)),
            data_dir: data_dir.to_path_buf(),
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Grocery items needed to cook `recipe` with what the pantry holds now.
    pub fn shortfall(&self, recipe: &Recipe) -> Result<Vec<GroceryItem>> {
        let pantry = self.pantry.load_all()?;
        Ok(shortfall_against(&recipe.ingredients, &pantry))
    }

    /// Add the shortfall for `recipe_id` to the grocery list. `None` when the
    /// recipe does not exist.
    pub fn generate_grocery_for_recipe(
        &self,
        recipe_id: i64,
    ) -> Result<Option<Vec<SaveOutcome<GroceryItem>>>> {
        let Some(recipe) = self.recipes.get(recipe_id)? else {
            return Ok(None);
        };
        self.add_shortfall(&recipe).map(Some)
    }

    fn add_shortfall(&self, recipe: &Recipe) -> Result<Vec<SaveOutcome<GroceryItem>>> {
        let needed = self.shortfall(recipe)?;
        debug!(recipe = %recipe.name, items = needed.len(), "grocery shortfall");
        needed
            .into_iter()
            .map(|item| self.grocery.save(item))
            .collect()
    }

    /// Move every grocery item into the pantry, then empty the grocery list.
    pub fn sync_grocery_to_pantry(&self) -> Result<Vec<SaveOutcome<PantryItem>>> {
        let items = self.grocery.load_all()?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let synced = items
            .into_iter()
            .map(|g| self.pantry.save(PantryItem::new(g.name, g.quantity, g.unit)))
            .collect::<Result<Vec<_>>>()?;
        self.grocery.clear_all()?;
        Ok(synced)
    }

    /// Plan `recipe_id` for one day. `None` when the recipe does not exist.
    pub fn plan_day(
        &self,
        week: &str,
        day: &str,
        recipe_id: i64,
    ) -> Result<Option<SaveOutcome<MealPlanEntry>>> {
        let Some(recipe) = self.recipes.get(recipe_id)? else {
            return Ok(None);
        };
        self.meal_plan
            .save(MealPlanEntry::new(week, day, recipe.id, recipe.name))
            .map(Some)
    }

    /// Fill Mon..Sun of `week` by cycling through the recipes in table order.
    pub fn autofill_week(&self, week: &str) -> Result<Vec<MealPlanEntry>> {
        let recipes = self.recipes.load_all()?;
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        WEEK_DAYS
            .iter()
            .zip(recipes.iter().cycle())
            .map(|(day, recipe)| {
                self.meal_plan
                    .save(MealPlanEntry::new(week, *day, recipe.id, recipe.name.clone()))
                    .map(SaveOutcome::into_record)
            })
            .collect()
    }

    /// Add the shortfall of every recipe planned for `week`. Entries whose
    /// recipe has since been deleted are skipped.
    pub fn groceries_for_week(&self, week: &str) -> Result<Vec<SaveOutcome<GroceryItem>>> {
        let mut outcomes = Vec::new();
        for entry in self.meal_plan.find_by_week(week)? {
            match self.recipes.get(entry.recipe_id)? {
                Some(recipe) => outcomes.extend(self.add_shortfall(&recipe)?),
                None => debug!(recipe_id = entry.recipe_id, "planned recipe no longer exists"),
            }
        }
        Ok(outcomes)
    }

    /// Save each imported item with the usual pantry merge rules.
    pub fn import_pantry(&self, items: Vec<PantryItem>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for item in items {
            if self.pantry.save(item)?.was_inserted() {
                summary.added += 1;
            } else {
                summary.merged += 1;
            }
        }
        Ok(summary)
    }
}

/// What must be bought to cover `ingredients` given `pantry`.
///
/// Units are never converted: when both sides name a unit and they differ,
/// the full required amount is listed.
#[must_use]
pub fn shortfall_against(ingredients: &[IngredientToken], pantry: &[PantryItem]) -> Vec<GroceryItem> {
    let mut needed = Vec::new();
    for token in ingredients {
        let name = token.name();
        let unit = token.unit();
        let full_amount = if token.amount().is_empty() {
            DEFAULT_QUANTITY
        } else {
            token.amount()
        };

        let key = normalize_name(name);
        let Some(stock) = pantry.iter().find(|p| p.is_saved() && p.key() == key) else {
            needed.push(GroceryItem::new(name, full_amount, unit));
            continue;
        };

        let stock_unit = stock.unit.trim();
        if !unit.is_empty() && !stock_unit.is_empty() && unit != stock_unit {
            needed.push(GroceryItem::new(name, full_amount, unit));
            continue;
        }

        let need = token.numeric_amount();
        let have = lenient_amount(&stock.quantity);
        if need == 0.0 {
            if have <= 0.0 {
                needed.push(GroceryItem::new(name, DEFAULT_QUANTITY, unit));
            }
        } else if need > have {
            needed.push(GroceryItem::new(name, format_quantity(need - have), unit));
        }
    }
    needed
}

/// Tokens of `recipe` whose name is not among `have` (case-insensitive).
#[must_use]
pub fn missing_ingredients(recipe: &Recipe, have: &[String]) -> Vec<IngredientToken> {
    let have: Vec<String> = have.iter().map(|h| normalize_name(h)).collect();
    recipe
        .ingredients
        .iter()
        .filter(|t| !have.contains(&normalize_name(t.name())))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SilentSink;
    use crate::token::parse_list;

    fn kitchen(dir: &Path) -> Kitchen {
        Kitchen::open(dir, Rc::new(SilentSink))
    }

    fn pantry(items: &[(&str, &str, &str)]) -> Vec<PantryItem> {
        items
            .iter()
            .zip(1..)
            .map(|((n, q, u), id)| PantryItem {
                id,
                ..PantryItem::new(*n, *q, *u)
            })
            .collect()
    }

    #[test]
    fn test_shortfall_rules() {
        let tokens = parse_list(
            "flour|3|cups, milk|1|l, salt, pepper, sugar|1|cup, eggs|2|, oil|1|tbsp",
        );
        let stock = pantry(&[
            ("Flour", "1", "cups"),
            ("milk", "2", "gal"),
            ("salt", "0", ""),
            ("pepper", "1", "jar"),
            ("sugar", "5", "cup"),
            ("eggs", "1", ""),
        ]);

        let needed = shortfall_against(&tokens, &stock);
        assert_eq!(
            needed,
            vec![
                // Partial stock: only the difference.
                GroceryItem::new("flour", "2", "cups"),
                // Units differ: not comparable, full amount.
                GroceryItem::new("milk", "1", "l"),
                // Unmeasured and out of stock.
                GroceryItem::new("salt", "1", ""),
                GroceryItem::new("eggs", "1", ""),
                // Not in the pantry at all.
                GroceryItem::new("oil", "1", "tbsp"),
            ]
        );
    }

    #[test]
    fn test_generate_grocery_merges_into_list() {
        let dir = tempfile::tempdir().unwrap();
        let k = kitchen(dir.path());
        let recipe = k
            .recipes
            .save(Recipe::new("Cake", parse_list("flour|2|cups, egg|2|unit"), "Bake."))
            .unwrap();
        k.pantry.save(PantryItem::new("Flour", "0.5", "cups")).unwrap();
        k.grocery.save(GroceryItem::new("egg", "1", "unit")).unwrap();

        let outcomes = k.generate_grocery_for_recipe(recipe.id).unwrap().unwrap();
        assert_eq!(outcomes.len(), 2);

        let list = k.grocery.load_all().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].quantity, "3");
        assert_eq!(list[1], GroceryItem { id: 2, ..GroceryItem::new("flour", "1.5", "cups") });

        assert!(k.generate_grocery_for_recipe(42).unwrap().is_none());
    }

    #[test]
    fn test_sync_grocery_to_pantry() {
        let dir = tempfile::tempdir().unwrap();
        let k = kitchen(dir.path());
        k.pantry.save(PantryItem::new("Rice", "1", "kg")).unwrap();
        k.grocery.save(GroceryItem::new("rice", "2", "kg")).unwrap();
        k.grocery.save(GroceryItem::new("Beans", "3", "can")).unwrap();

        let synced = k.sync_grocery_to_pantry().unwrap();
        assert_eq!(synced.len(), 2);
        assert!(k.grocery.load_all().unwrap().is_empty());

        let stock = k.pantry.load_all().unwrap();
        assert_eq!(stock.len(), 2);
        assert_eq!(stock[0].quantity, "3");
        assert_eq!(stock[1].name, "Beans");

        assert!(k.sync_grocery_to_pantry().unwrap().is_empty());
    }

    #[test]
    fn test_plan_day_resolves_recipe_name() {
        let dir = tempfile::tempdir().unwrap();
        let k = kitchen(dir.path());
        let soup = k.recipes.save(Recipe::new("Soup", vec![], "Boil.")).unwrap();

        let outcome = k.plan_day("W1", "Mon", soup.id).unwrap().unwrap();
        assert_eq!(outcome.record().recipe_name, "Soup");
        assert!(k.plan_day("W1", "Tue", 99).unwrap().is_none());
        assert_eq!(k.meal_plan.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_autofill_week_cycles_recipes() {
        let dir = tempfile::tempdir().unwrap();
        let k = kitchen(dir.path());
        assert!(k.autofill_week("W1").unwrap().is_empty());

        for name in ["A", "B", "C"] {
            k.recipes.save(Recipe::new(name, vec![], "")).unwrap();
        }
        let plan = k.autofill_week("W1").unwrap();
        let names: Vec<&str> = plan.iter().map(|m| m.recipe_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "A", "B", "C", "A"]);
        assert_eq!(plan[6].day, "Sun");

        // Running it again replaces the same seven slots.
        k.autofill_week("W1").unwrap();
        assert_eq!(k.meal_plan.find_by_week("W1").unwrap().len(), 7);
    }

    #[test]
    fn test_groceries_for_week_skips_deleted_recipes() {
        let dir = tempfile::tempdir().unwrap();
        let k = kitchen(dir.path());
        let a = k.recipes.save(Recipe::new("A", parse_list("leek|1|unit"), "")).unwrap();
        let b = k.recipes.save(Recipe::new("B", parse_list("kale|1|bunch"), "")).unwrap();
        k.plan_day("W1", "Mon", a.id).unwrap();
        k.plan_day("W1", "Tue", b.id).unwrap();
        k.plan_day("W1", "Wed", a.id).unwrap();
        k.recipes.delete_by_id(b.id).unwrap();

        k.groceries_for_week("W1").unwrap();
        let list = k.grocery.load_all().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "leek");
        assert_eq!(list[0].quantity, "2");
    }

    #[test]
    fn test_missing_ingredients() {
        let recipe = Recipe::new("Toast", parse_list("Bread|2|slices, butter, jam"), "");
        let missing = missing_ingredients(&recipe, &["bread".to_string(), " BUTTER ".to_string()]);
        assert_eq!(missing, vec![IngredientToken::name_only("jam")]);
    }

    #[test]
    fn test_import_pantry_counts() {
        let dir = tempfile::tempdir().unwrap();
        let k = kitchen(dir.path());
        k.pantry.save(PantryItem::new("Oats", "1", "kg")).unwrap();
        let summary = k
            .import_pantry(vec![
                PantryItem::new("oats", "1", "kg"),
                PantryItem::new("Honey", "1", "jar"),
            ])
            .unwrap();
        assert_eq!(summary, ImportSummary { added: 1, merged: 1 });
    }

    #[test]
    fn test_seeded_kitchen_starts_with_samples() {
        let dir = tempfile::tempdir().unwrap();
        let k = Kitchen::open_with_seed(dir.path(), Rc::new(SilentSink), 5);
        let recipes = k.recipes.load_all().unwrap();
        assert_eq!(recipes.len(), 5);
        assert_eq!(k.recipes.save(Recipe::new("Mine", vec![], "")).unwrap().id, 6);
    }
}
