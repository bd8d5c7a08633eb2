use anyhow::{Result, bail};

use mise_core::{GroceryItem, Kitchen, SaveOutcome};

use super::helpers::exit_not_found;
use super::pantry::print_quantity_table;

fn records<R>(outcomes: &[SaveOutcome<R>]) -> Vec<&R> {
    outcomes.iter().map(SaveOutcome::record).collect()
}

pub(crate) fn cmd_grocery_add(
    kitchen: &Kitchen,
    name: &str,
    quantity: &str,
    unit: &str,
    json: bool,
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Item name cannot be empty");
    }
    let outcome = kitchen
        .grocery
        .save(GroceryItem::new(name, quantity.trim(), unit.trim()))?;
    if json {
        println!("{}", serde_json::to_string_pretty(outcome.record())?);
    }
    Ok(())
}

pub(crate) fn cmd_grocery_list(kitchen: &Kitchen, json: bool) -> Result<()> {
    let items = kitchen.grocery.load_all()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    if items.is_empty() {
        eprintln!("Grocery list is empty");
        return Ok(());
    }
    print_quantity_table(
        items
            .iter()
            .map(|g| (g.id, g.name.as_str(), g.quantity.as_str(), g.unit.as_str())),
    );
    Ok(())
}

pub(crate) fn cmd_grocery_update(
    kitchen: &Kitchen,
    id: i64,
    quantity: &str,
    json: bool,
) -> Result<()> {
    if !kitchen.grocery.update_quantity_by_id(id, quantity.trim())? {
        exit_not_found(&format!("Grocery item {id} not found"), json);
    }
    let item = kitchen.grocery.find_by_id(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        println!("Updated {} to {} {}", item.name, item.quantity, item.unit);
    }
    Ok(())
}

pub(crate) fn cmd_grocery_remove(kitchen: &Kitchen, id: i64, json: bool) -> Result<()> {
    if !kitchen.grocery.delete_by_id(id)? {
        exit_not_found(&format!("Grocery item {id} not found"), json);
    }
    if json {
        println!("{}", serde_json::json!({ "removed": id }));
    } else {
        println!("Removed grocery item {id}");
    }
    Ok(())
}

pub(crate) fn cmd_grocery_clear(kitchen: &Kitchen, json: bool) -> Result<()> {
    kitchen.grocery.clear_all()?;
    if json {
        println!("{}", serde_json::json!({ "cleared": true }));
    } else {
        println!("Grocery list cleared");
    }
    Ok(())
}

pub(crate) fn cmd_grocery_generate(kitchen: &Kitchen, recipe_id: i64, json: bool) -> Result<()> {
    let Some(outcomes) = kitchen.generate_grocery_for_recipe(recipe_id)? else {
        exit_not_found(&format!("Recipe {recipe_id} not found"), json);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&records(&outcomes))?);
    } else if outcomes.is_empty() {
        println!("The pantry already covers recipe {recipe_id}");
    } else {
        println!("{} item(s) added to the grocery list", outcomes.len());
    }
    Ok(())
}

pub(crate) fn cmd_grocery_sync(kitchen: &Kitchen, json: bool) -> Result<()> {
    let synced = kitchen.sync_grocery_to_pantry()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records(&synced))?);
    } else if synced.is_empty() {
        println!("Grocery list is empty; nothing to move");
    } else {
        println!("Moved {} item(s) into the pantry", synced.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mise_core::PantryItem;

    #[test]
    fn test_records_keeps_order() {
        let outcomes = vec![
            SaveOutcome::Inserted(PantryItem::new("a", "1", "")),
            SaveOutcome::Updated {
                before: PantryItem::new("b", "1", ""),
                after: PantryItem::new("b", "2", ""),
            },
        ];
        let names: Vec<&str> = records(&outcomes).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(records(&outcomes)[1].quantity, "2");
    }
}
