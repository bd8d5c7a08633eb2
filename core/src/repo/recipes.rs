use crate::error::Result;
use crate::line_codec::Row;
use crate::migrate::{RowShape, read_migrated};
use crate::models::Recipe;
use crate::table::{Record, Table, decode_rows};

use super::reported;

pub const FILE_NAME: &str = "recipes.csv";

/// Recipe rows gained their id column after the first release.
const SHAPE: RowShape = RowShape::with_id_added(Recipe::COLUMNS);

#[derive(Debug)]
pub struct RecipeRepo {
    table: Table,
}

impl RecipeRepo {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    // Every read goes through the migrator, so legacy files are upgraded the
    // first time anything touches them.
    fn rows(&self) -> Result<Vec<Row>> {
        read_migrated(&self.table, SHAPE)
    }

    pub fn load_all(&self) -> Result<Vec<Recipe>> {
        Ok(decode_rows(&self.rows()?, self.table.path()))
    }

    /// First recipe matching `pred`, or the zero-value recipe (`id == 0`).
    pub fn find_by(&self, pred: impl Fn(&Recipe) -> bool) -> Result<Recipe> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|r| pred(r))
            .unwrap_or_default())
    }

    pub fn find_by_id(&self, id: i64) -> Result<Recipe> {
        if id <= 0 {
            return Ok(Recipe::default());
        }
        self.find_by(|r| r.id == id)
    }

    pub fn get(&self, id: i64) -> Result<Option<Recipe>> {
        Ok(Some(self.find_by_id(id)?).filter(Recipe::is_saved))
    }

    /// Append `recipe` under a freshly allocated id. Recipes are never merged:
    /// saving the same name twice yields two rows.
    pub fn save(&self, recipe: Recipe) -> Result<Recipe> {
        let result = self
            .rows()
            .and_then(|rows| self.table.insert(rows, recipe));
        let saved = reported(&self.table, "save recipe", result)?;
        self.table
            .emit(&format!("Recipe '{}' added successfully!", saved.name));
        Ok(saved)
    }

    pub fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = self
            .rows()
            .and_then(|_| self.table.delete_by_id(id, Recipe::COLUMNS));
        reported(&self.table, "delete recipe", result)
    }

    /// Case-insensitive substring match on the recipe name.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<Recipe>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Case-insensitive substring match on any stored ingredient token.
    pub fn search_by_ingredient(&self, query: &str) -> Result<Vec<Recipe>> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| {
                r.ingredients
                    .iter()
                    .any(|t| t.encode().to_lowercase().contains(&needle))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{RecordingSink, SilentSink};
    use crate::token::{IngredientToken, parse_list};
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;

    fn repo(dir: &Path) -> RecipeRepo {
        RecipeRepo::new(Table::new(dir.join(FILE_NAME), Rc::new(SilentSink)))
    }

    fn soup() -> Recipe {
        Recipe::new("Soup", parse_list("water|1|l, salt"), "Boil.")
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        let ids: Vec<i64> = (0..5).map(|_| repo.save(soup()).unwrap().id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_same_name_is_not_merged() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        repo.save(soup()).unwrap();
        repo.save(soup()).unwrap();
        assert_eq!(repo.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_delete_then_insert_exceeds_remaining_max() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        for _ in 0..3 {
            repo.save(soup()).unwrap();
        }
        assert!(repo.delete_by_id(2).unwrap());
        assert!(!repo.delete_by_id(2).unwrap());
        let next = repo.save(soup()).unwrap();
        assert_eq!(next.id, 4);
        let ids: Vec<i64> = repo.load_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_find_by_id_and_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        let saved = repo.save(soup()).unwrap();

        let found = repo.find_by_id(saved.id).unwrap();
        assert_eq!(found, saved);
        assert_eq!(
            found.ingredients[0],
            IngredientToken::measured("water", "1", "l")
        );

        assert_eq!(repo.find_by_id(99).unwrap().id, 0);
        assert!(repo.get(99).unwrap().is_none());
        assert!(repo.get(0).unwrap().is_none());
    }

    #[test]
    fn test_legacy_file_is_migrated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        repo.table().ensure_exists().unwrap();
        fs::write(
            repo.table().path(),
            "Pancakes,flour|2|cups;egg|1|unit,Whisk and fry\nToast,bread,Heat\n",
        )
        .unwrap();

        let recipes = repo.load_all().unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, 1);
        assert_eq!(recipes[0].name, "Pancakes");
        assert_eq!(recipes[0].ingredients.len(), 2);
        assert_eq!(recipes[1].id, 2);
        assert_eq!(
            fs::read_to_string(repo.table().path()).unwrap(),
            "1,Pancakes,flour|2|cups;egg|1|unit,Whisk and fry\n2,Toast,bread,Heat\n"
        );
    }

    #[test]
    fn test_legacy_file_is_migrated_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        repo.table().ensure_exists().unwrap();
        fs::write(repo.table().path(), "Toast,bread,Heat\n").unwrap();

        let saved = repo.save(soup()).unwrap();
        assert_eq!(saved.id, 2);
        let recipes = repo.load_all().unwrap();
        assert_eq!(recipes[0].id, 1);
        assert_eq!(recipes[0].name, "Toast");
    }

    #[test]
    fn test_search() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        repo.save(soup()).unwrap();
        repo.save(Recipe::new("Pasta Soup", parse_list("pasta|200|g"), "Cook."))
            .unwrap();
        repo.save(Recipe::new("Salad", parse_list("lettuce, SALT"), "Toss."))
            .unwrap();

        assert_eq!(repo.search_by_name("soup").unwrap().len(), 2);
        assert_eq!(repo.search_by_ingredient("salt").unwrap().len(), 2);
        assert_eq!(repo.search_by_ingredient("200").unwrap().len(), 1);
        assert!(repo.search_by_name("stew").unwrap().is_empty());
    }

    #[test]
    fn test_save_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Rc::new(RecordingSink::new());
        let repo = RecipeRepo::new(Table::new(dir.path().join(FILE_NAME), sink.clone()));
        repo.save(soup()).unwrap();
        assert!(sink.contains("Recipe 'Soup' added successfully!"));
    }

    #[test]
    fn test_save_failure_is_reported_not_panicked() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "file").unwrap();
        let sink = Rc::new(RecordingSink::new());
        let repo = RecipeRepo::new(Table::new(blocker.join(FILE_NAME), sink.clone()));

        assert!(repo.save(soup()).is_err());
        assert!(sink.contains("Could not save recipe"));
    }

    #[test]
    fn test_awkward_fields_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(dir.path());
        let saved = repo
            .save(Recipe::new(
                "Soup, \"hearty\" 1:2",
                vec![
                    IngredientToken::measured("water", "1", "l"),
                    IngredientToken::name_only("stock cube 1:4"),
                ],
                "Boil.\nServe, hot | fast",
            ))
            .unwrap();
        let plain = repo.save(soup()).unwrap();

        assert_eq!(repo.load_all().unwrap(), vec![saved, plain]);
    }
}
