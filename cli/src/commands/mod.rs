mod grocery;
mod helpers;
mod pantry;
mod plan;
mod recipe;

pub(crate) use grocery::{
    cmd_grocery_add, cmd_grocery_clear, cmd_grocery_generate, cmd_grocery_list,
    cmd_grocery_remove, cmd_grocery_sync, cmd_grocery_update,
};
pub(crate) use helpers::{parse_day, resolve_week};
pub(crate) use pantry::{
    cmd_pantry_add, cmd_pantry_delete, cmd_pantry_import, cmd_pantry_list, cmd_pantry_update,
};
pub(crate) use plan::{
    cmd_plan_autofill, cmd_plan_clear, cmd_plan_groceries, cmd_plan_set, cmd_plan_show,
};
pub(crate) use recipe::{
    cmd_recipe_add, cmd_recipe_check, cmd_recipe_delete, cmd_recipe_import, cmd_recipe_list,
    cmd_recipe_search, cmd_recipe_show,
};
