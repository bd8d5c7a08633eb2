//! Deterministic sample recipes written when the recipe table is first
//! created.

use crate::line_codec::Row;
use crate::models::Recipe;
use crate::table::Record;
use crate::token::decode_list;

const SAMPLES: &[(&str, &str, &str)] = &[
    (
        "Classic Pancakes",
        "flour|2|cups;milk|1.5|cups;egg|1|unit;sugar|2|tbsp;baking powder|2|tsp",
        "Whisk the dry ingredients, beat in milk and egg, then fry ladlefuls on a hot griddle.",
    ),
    (
        "Spaghetti Bolognese",
        "spaghetti|200|g;ground beef|300|g;tomato sauce|1|cup;onion|1|unit;garlic|2|cloves",
        "Brown the beef with onion and garlic, add sauce and simmer. Serve over spaghetti.",
    ),
    (
        "Chicken Stir-Fry",
        "chicken breast|300|g;soy sauce|2|tbsp;broccoli|150|g;bell pepper|1|unit;garlic|2|cloves",
        "Slice everything thin and stir-fry over high heat, finishing with soy sauce.",
    ),
    (
        "Vegetable Curry",
        "chickpeas|1|cup;coconut milk|1|cup;curry powder|2|tbsp;spinach|2|cups;onion|1|unit",
        "Soften onion, toast the spice, add chickpeas and coconut milk, wilt in spinach.",
    ),
    (
        "Tomato Basil Soup",
        "tomato|4|unit;vegetable stock|4|cups;basil;onion|1|unit;cream|0.5|cup",
        "Simmer tomatoes and onion in stock, blend smooth, stir in cream and torn basil.",
    ),
    (
        "Lentil Stew",
        "lentils|1|cup;carrot|2|unit;celery|2|stalks;tomato paste|2|tbsp;stock|4|cups",
        "Sweat the vegetables, add lentils, paste and stock, and cook until tender.",
    ),
    (
        "Mushroom Risotto",
        "arborio rice|1|cup;mushrooms|200|g;parmesan|0.5|cup;stock|4|cups;butter|2|tbsp",
        "Toast the rice, add stock a ladle at a time, fold in mushrooms, butter and cheese.",
    ),
    (
        "Greek Salad",
        "cucumber|1|unit;tomato|2|unit;feta|0.5|cup;olive oil|2|tbsp;oregano|1|tsp",
        "Chop, combine, crumble over the feta and dress with oil and oregano.",
    ),
    (
        "Egg Fried Rice",
        "rice|2|cups;egg|2|unit;peas|1|cup;soy sauce|2|tbsp;sesame oil|1|tbsp",
        "Scramble the eggs, add cold rice and peas, season with soy and sesame oil.",
    ),
    (
        "Pesto Pasta",
        "pasta|200|g;pesto|0.5|cup;pine nuts|2|tbsp;parmesan|0.25|cup",
        "Cook the pasta, toss with pesto and top with toasted pine nuts and parmesan.",
    ),
    (
        "Roast Chicken",
        "whole chicken|1|unit;lemon|1|unit;rosemary|1|sprig;olive oil|2|tbsp;salt",
        "Rub with oil and salt, stuff with lemon and rosemary, roast until the juices run clear.",
    ),
    (
        "Stuffed Peppers",
        "bell pepper|2|unit;rice|1|cup;ground beef|300|g;tomato|1|unit;cheese|0.5|cup",
        "Fill the peppers with cooked rice and beef, top with cheese and bake.",
    ),
];

/// `count` sample recipes with ids `1..=count`. Names repeat with a
/// ` Variant k` suffix once the sample list is exhausted.
#[must_use]
pub fn sample_recipes(count: usize) -> Vec<Recipe> {
    (0..count)
        .zip(1_i64..)
        .map(|(idx, id)| {
            let (name, ingredients, instructions) = SAMPLES[idx % SAMPLES.len()];
            let round = idx / SAMPLES.len();
            let name = if round == 0 {
                name.to_string()
            } else {
                format!("{name} Variant {}", round + 1)
            };
            Recipe {
                id,
                name,
                ingredients: decode_list(ingredients),
                instructions: instructions.to_string(),
            }
        })
        .collect()
}

#[must_use]
pub fn sample_recipe_rows(count: usize) -> Vec<Row> {
    sample_recipes(count).iter().map(Record::to_row).collect()
}
