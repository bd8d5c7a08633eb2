use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::Path;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use mise_core::numeric::format_quantity;
use mise_core::token::parse_list;
use mise_core::{IngredientToken, Kitchen, Recipe, missing_ingredients};

use super::helpers::{exit_not_found, truncate};

pub(crate) fn cmd_recipe_add(
    kitchen: &Kitchen,
    name: &str,
    ingredients: &str,
    instructions: &str,
    json: bool,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Recipe name cannot be empty");
    }
    let recipe = kitchen
        .recipes
        .save(Recipe::new(name, parse_list(ingredients), instructions))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let id = recipe.id;
        println!("Show it with: mise recipe show {id}");
    }
    Ok(())
}

pub(crate) fn cmd_recipe_list(kitchen: &Kitchen, json: bool) -> Result<()> {
    let recipes = kitchen.recipes.load_all()?;
    if recipes.is_empty() {
        if json {
            println!("[]");
        } else {
            eprintln!("No recipes found");
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }
    print_recipe_table(&recipes);
    Ok(())
}

fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Ingredients")]
        ingredients: usize,
        #[tabled(rename = "Instructions")]
        instructions: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id,
            name: truncate(&r.name, 30),
            ingredients: r.ingredients.len(),
            instructions: truncate(&r.instructions, 40),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_recipe_show(kitchen: &Kitchen, id: i64, json: bool) -> Result<()> {
    let Some(recipe) = kitchen.recipes.get(id)? else {
        exit_not_found(&format!("Recipe {id} not found"), json);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    let name = &recipe.name;
    println!("=== {name} ===\n");
    println!("  INGREDIENTS:");
    if recipe.ingredients.is_empty() {
        println!("    (none)");
    }
    for token in &recipe.ingredients {
        println!("    {token}");
    }
    if !recipe.instructions.is_empty() {
        println!("\n  INSTRUCTIONS:");
        println!("    {}", recipe.instructions);
    }
    Ok(())
}

pub(crate) fn cmd_recipe_search(
    kitchen: &Kitchen,
    query: &str,
    by_ingredient: bool,
    json: bool,
) -> Result<()> {
    let found = if by_ingredient {
        kitchen.recipes.search_by_ingredient(query)?
    } else {
        kitchen.recipes.search_by_name(query)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
    } else if found.is_empty() {
        eprintln!("No recipes match '{query}'");
    } else {
        print_recipe_table(&found);
    }
    Ok(())
}

pub(crate) fn cmd_recipe_delete(kitchen: &Kitchen, id: i64, json: bool) -> Result<()> {
    if !kitchen.recipes.delete_by_id(id)? {
        exit_not_found(&format!("Recipe {id} not found"), json);
    }
    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted recipe {id}");
    }
    Ok(())
}

/// List the ingredients of a recipe that are not on hand. Without `have`,
/// the pantry contents are used.
pub(crate) fn cmd_recipe_check(
    kitchen: &Kitchen,
    id: i64,
    have: Option<&str>,
    json: bool,
) -> Result<()> {
    #[derive(Serialize)]
    struct CheckResult<'a> {
        recipe: &'a str,
        missing: Vec<IngredientToken>,
    }

    let Some(recipe) = kitchen.recipes.get(id)? else {
        exit_not_found(&format!("Recipe {id} not found"), json);
    };

    let have: Vec<String> = match have {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
        None => kitchen
            .pantry
            .load_all()?
            .into_iter()
            .map(|p| p.name)
            .collect(),
    };
    let missing = missing_ingredients(&recipe, &have);

    if json {
        let result = CheckResult {
            recipe: &recipe.name,
            missing,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if missing.is_empty() {
        println!("You have everything for {}", recipe.name);
    } else {
        println!("Missing for {}:", recipe.name);
        for token in &missing {
            println!("  - {token}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_recipe_import(
    kitchen: &Kitchen,
    file: &Path,
    name_override: Option<String>,
    json: bool,
) -> Result<()> {
    let input = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let (name, ingredients, instructions) = parse_cooklang(&input)?;

    let name = name_override
        .or(name)
        .or_else(|| file.file_stem().and_then(|s| s.to_str()).map(String::from))
        .context("Could not determine recipe name. Use --name to specify one")?;

    if ingredients.is_empty() {
        bail!("No ingredients found in recipe");
    }

    let recipe = kitchen
        .recipes
        .save(Recipe::new(name, ingredients, instructions))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let count = recipe.ingredients.len();
        println!("Imported {count} ingredients (id: {})", recipe.id);
    }
    Ok(())
}

/// Title, ingredient tokens and step text of a Cooklang recipe.
fn parse_cooklang(input: &str) -> Result<(Option<String>, Vec<IngredientToken>, String)> {
    let (recipe, _report) = cooklang::parse(input)
        .into_result()
        .map_err(|e| anyhow::anyhow!("Failed to parse Cooklang file: {e}"))?;

    let title = recipe.metadata.title().map(String::from);

    let converter = cooklang::Converter::default();
    let tokens = recipe
        .group_ingredients(&converter)
        .iter()
        .map(|gi| cooklang_token(gi))
        .collect();

    Ok((title, tokens, step_lines(input)))
}

/// Step lines joined with spaces, markup kept. Metadata and comment lines
/// are dropped.
fn step_lines(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(">>") && !line.starts_with("--"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn cooklang_token(gi: &cooklang::ingredient_list::GroupedIngredient<'_>) -> IngredientToken {
    let name = gi.ingredient.display_name().to_string();
    let Some(qty) = gi.quantity.iter().next() else {
        return IngredientToken::name_only(name);
    };
    let amount = match qty.value() {
        cooklang::Value::Number(n) => format_quantity(n.value()),
        cooklang::Value::Range { start, .. } => format_quantity(start.value()),
        cooklang::Value::Text(t) => t.clone(),
    };
    let unit = qty.unit().unwrap_or_default().to_string();
    IngredientToken::measured(name, amount, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cooklang_tokens() {
        let input = ">> title: Pancakes\nMix @flour{200%g} with @eggs{2} and a pinch of @salt.\n";
        let (title, tokens, steps) = parse_cooklang(input).unwrap();
        assert_eq!(title.as_deref(), Some("Pancakes"));
        assert_eq!(
            tokens,
            vec![
                IngredientToken::measured("flour", "200", "g"),
                IngredientToken::measured("eggs", "2", ""),
                IngredientToken::name_only("salt"),
            ]
        );
        assert_eq!(steps, "Mix @flour{200%g} with @eggs{2} and a pinch of @salt.");
    }

    #[test]
    fn test_parse_cooklang_without_title() {
        let (title, tokens, _) = parse_cooklang("Boil @water{1%l}.\n").unwrap();
        assert!(title.is_none());
        assert_eq!(tokens, vec![IngredientToken::measured("water", "1", "l")]);
    }

    #[test]
    fn test_step_lines_skip_metadata_and_comments() {
        let input = ">> servings: 2\n-- a note\n\nChop @onion.\n  Fry it.  \n";
        assert_eq!(step_lines(input), "Chop @onion. Fry it.");
    }
}
