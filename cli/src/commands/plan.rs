use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use mise_core::{Kitchen, MealPlanEntry, SaveOutcome};

use super::helpers::{day_index, exit_not_found, truncate};

pub(crate) fn cmd_plan_set(
    kitchen: &Kitchen,
    week: &str,
    day: &str,
    recipe_id: i64,
    json: bool,
) -> Result<()> {
    let Some(outcome) = kitchen.plan_day(week, day, recipe_id)? else {
        exit_not_found(&format!("Recipe {recipe_id} not found"), json);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(outcome.record())?);
    } else if let SaveOutcome::Updated { before, .. } = &outcome {
        println!("Replaced {}", before.recipe_name);
    }
    Ok(())
}

pub(crate) fn cmd_plan_show(kitchen: &Kitchen, week: &str, json: bool) -> Result<()> {
    let mut entries = kitchen.meal_plan.find_by_week(week)?;
    entries.sort_by_key(|e| day_index(&e.day));

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        eprintln!("Nothing planned for {week}");
        return Ok(());
    }
    println!("=== {week} ===");
    print_plan_table(&entries);
    Ok(())
}

fn print_plan_table(entries: &[MealPlanEntry]) {
    #[derive(Tabled)]
    struct PlanRow {
        #[tabled(rename = "Day")]
        day: String,
        #[tabled(rename = "Recipe ID")]
        recipe_id: i64,
        #[tabled(rename = "Recipe")]
        recipe: String,
    }

    let rows: Vec<PlanRow> = entries
        .iter()
        .map(|e| PlanRow {
            day: e.day.clone(),
            recipe_id: e.recipe_id,
            recipe: truncate(&e.recipe_name, 35),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_plan_autofill(kitchen: &Kitchen, week: &str, json: bool) -> Result<()> {
    let entries = kitchen.autofill_week(week)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        eprintln!("No recipes to plan with. Add one with: mise recipe add");
    } else {
        println!("=== {week} ===");
        print_plan_table(&entries);
    }
    Ok(())
}

pub(crate) fn cmd_plan_clear(kitchen: &Kitchen, week: &str, json: bool) -> Result<()> {
    let removed = kitchen.meal_plan.clear_week(week)?;
    if json {
        println!("{}", serde_json::json!({ "week": week, "removed": removed }));
    } else {
        println!("Cleared {removed} planned meal(s) from {week}");
    }
    Ok(())
}

pub(crate) fn cmd_plan_groceries(kitchen: &Kitchen, week: &str, json: bool) -> Result<()> {
    let outcomes = kitchen.groceries_for_week(week)?;
    if json {
        let items: Vec<_> = outcomes.iter().map(SaveOutcome::record).collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else if outcomes.is_empty() {
        println!("Nothing to buy for {week}");
    } else {
        println!("{} grocery update(s) for {week}", outcomes.len());
    }
    Ok(())
}
