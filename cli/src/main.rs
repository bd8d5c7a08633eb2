mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::rc::Rc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    cmd_grocery_add, cmd_grocery_clear, cmd_grocery_generate, cmd_grocery_list,
    cmd_grocery_remove, cmd_grocery_sync, cmd_grocery_update, cmd_pantry_add, cmd_pantry_delete,
    cmd_pantry_import, cmd_pantry_list, cmd_pantry_update, cmd_plan_autofill, cmd_plan_clear,
    cmd_plan_groceries, cmd_plan_set, cmd_plan_show, cmd_recipe_add, cmd_recipe_check,
    cmd_recipe_delete, cmd_recipe_import, cmd_recipe_list, cmd_recipe_search, cmd_recipe_show,
    parse_day, resolve_week,
};
use crate::config::Config;
use mise_core::{ConsoleSink, Kitchen, SilentSink, StatusSink};

#[derive(Parser)]
#[command(
    name = "mise",
    version,
    about = "Recipes, pantry, groceries and a weekly meal plan in plain CSV files"
)]
struct Cli {
    /// Directory holding the data files (default: platform data dir)
    #[arg(long, global = true, env = "MISE_DATA_DIR", value_name = "PATH")]
    data_dir: Option<PathBuf>,
    /// Sample recipes to write when the recipe file is first created (0 disables)
    #[arg(long, global = true, env = "MISE_SEED_RECIPES", default_value = "25")]
    seed: usize,
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Manage pantry stock
    Pantry {
        #[command(subcommand)]
        command: PantryCommands,
    },
    /// Manage the grocery list
    Grocery {
        #[command(subcommand)]
        command: GroceryCommands,
    },
    /// Plan meals for a week
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Add a recipe
    Add {
        /// Recipe name
        name: String,
        /// Comma-separated ingredients: "flour:2:cups, salt" or "flour|2|cups"
        #[arg(short, long, default_value = "")]
        ingredients: String,
        /// Free-text instructions
        #[arg(long, default_value = "")]
        instructions: String,
    },
    /// List all recipes
    List,
    /// Show a recipe's ingredients and instructions
    Show {
        /// Recipe ID
        id: i64,
    },
    /// Search recipes by name, or by ingredient with --ingredient
    Search {
        /// Search text (case-insensitive)
        query: String,
        /// Match ingredients instead of names
        #[arg(long)]
        ingredient: bool,
    },
    /// Delete a recipe by ID
    Delete {
        /// Recipe ID
        id: i64,
    },
    /// List the ingredients of a recipe you do not have
    Check {
        /// Recipe ID
        id: i64,
        /// Comma-separated names on hand (default: pantry contents)
        #[arg(long)]
        have: Option<String>,
    },
    /// Import a recipe from a Cooklang (.cook) file
    Import {
        /// Path to the .cook file
        file: PathBuf,
        /// Override the recipe name
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum PantryCommands {
    /// Add stock; an existing item with the same name has the quantity added on
    Add {
        /// Ingredient name
        name: String,
        /// Quantity (default: 1)
        #[arg(default_value = "1")]
        quantity: String,
        /// Unit (e.g. g, cups, can)
        #[arg(short, long, default_value = "")]
        unit: String,
    },
    /// List pantry stock
    List,
    /// Set the quantity of a pantry item
    Update {
        /// Pantry item ID
        id: i64,
        /// New quantity
        quantity: String,
    },
    /// Delete a pantry item by ID
    Delete {
        /// Pantry item ID
        id: i64,
    },
    /// Import stock from a CSV file with name, quantity and unit columns
    Import {
        /// Path to the CSV file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum GroceryCommands {
    /// Add an item; the same name and unit has the quantity added on
    Add {
        /// Item name
        name: String,
        /// Quantity (default: 1)
        #[arg(default_value = "1")]
        quantity: String,
        /// Unit (e.g. g, cups, can)
        #[arg(short, long, default_value = "")]
        unit: String,
    },
    /// Show the grocery list
    List,
    /// Set the quantity of a grocery item
    Update {
        /// Grocery item ID
        id: i64,
        /// New quantity
        quantity: String,
    },
    /// Remove a grocery item by ID
    Remove {
        /// Grocery item ID
        id: i64,
    },
    /// Empty the grocery list
    Clear,
    /// Add what a recipe needs beyond current pantry stock
    Generate {
        /// Recipe ID
        recipe_id: i64,
    },
    /// Move everything on the grocery list into the pantry
    Sync,
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Plan a recipe for one day
    Set {
        /// Recipe ID
        recipe_id: i64,
        /// Day: mon-sun or monday-sunday
        #[arg(short, long)]
        day: String,
        /// Week label (default: current ISO week, e.g. 2024-W07)
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Show the plan for a week
    Show {
        /// Week label (default: current ISO week)
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Fill every day of a week by cycling through the recipes
    Autofill {
        /// Week label (default: current ISO week)
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Remove every planned meal of a week
    Clear {
        /// Week label (default: current ISO week)
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Add the groceries needed for every meal planned in a week
    Groceries {
        /// Week label (default: current ISO week)
        #[arg(short, long)]
        week: Option<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir, cli.seed)?;
    let json = cli.json;
    // JSON output must stay parseable, so status chatter is dropped.
    let sink: Rc<dyn StatusSink> = if json {
        Rc::new(SilentSink)
    } else {
        Rc::new(ConsoleSink)
    };
    let kitchen = Kitchen::open_with_seed(&config.data_dir, sink, config.seed_recipes);
    tracing::debug!(data_dir = %config.data_dir.display(), "opened kitchen");

    match cli.command {
        Commands::Recipe { command } => match command {
            RecipeCommands::Add {
                name,
                ingredients,
                instructions,
            } => cmd_recipe_add(&kitchen, &name, &ingredients, &instructions, json),
            RecipeCommands::List => cmd_recipe_list(&kitchen, json),
            RecipeCommands::Show { id } => cmd_recipe_show(&kitchen, id, json),
            RecipeCommands::Search { query, ingredient } => {
                cmd_recipe_search(&kitchen, &query, ingredient, json)
            }
            RecipeCommands::Delete { id } => cmd_recipe_delete(&kitchen, id, json),
            RecipeCommands::Check { id, have } => {
                cmd_recipe_check(&kitchen, id, have.as_deref(), json)
            }
            RecipeCommands::Import { file, name } => {
                cmd_recipe_import(&kitchen, &file, name, json)
            }
        },
        Commands::Pantry { command } => match command {
            PantryCommands::Add {
                name,
                quantity,
                unit,
            } => cmd_pantry_add(&kitchen, &name, &quantity, &unit, json),
            PantryCommands::List => cmd_pantry_list(&kitchen, json),
            PantryCommands::Update { id, quantity } => {
                cmd_pantry_update(&kitchen, id, &quantity, json)
            }
            PantryCommands::Delete { id } => cmd_pantry_delete(&kitchen, id, json),
            PantryCommands::Import { file } => cmd_pantry_import(&kitchen, &file, json),
        },
        Commands::Grocery { command } => match command {
            GroceryCommands::Add {
                name,
                quantity,
                unit,
            } => cmd_grocery_add(&kitchen, &name, &quantity, &unit, json),
            GroceryCommands::List => cmd_grocery_list(&kitchen, json),
            GroceryCommands::Update { id, quantity } => {
                cmd_grocery_update(&kitchen, id, &quantity, json)
            }
            GroceryCommands::Remove { id } => cmd_grocery_remove(&kitchen, id, json),
            GroceryCommands::Clear => cmd_grocery_clear(&kitchen, json),
            GroceryCommands::Generate { recipe_id } => {
                cmd_grocery_generate(&kitchen, recipe_id, json)
            }
            GroceryCommands::Sync => cmd_grocery_sync(&kitchen, json),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Set {
                recipe_id,
                day,
                week,
            } => cmd_plan_set(&kitchen, &resolve_week(week), &parse_day(&day)?, recipe_id, json),
            PlanCommands::Show { week } => cmd_plan_show(&kitchen, &resolve_week(week), json),
            PlanCommands::Autofill { week } => {
                cmd_plan_autofill(&kitchen, &resolve_week(week), json)
            }
            PlanCommands::Clear { week } => cmd_plan_clear(&kitchen, &resolve_week(week), json),
            PlanCommands::Groceries { week } => {
                cmd_plan_groceries(&kitchen, &resolve_week(week), json)
            }
        },
    }
}
