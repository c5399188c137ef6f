//! Built-in fallback catalog.
//!
//! A fixed handful of recipes used to keep exploratory search useful
//! when the user has nothing saved and no connectivity. Entries carry
//! no instructions of their own; [`placeholder_instructions`] fills
//! them in at presentation time.

use crate::models::{Difficulty, Origin, Recipe};

/// Synthesize generic preparation text for a catalog entry.
pub fn placeholder_instructions(title: &str) -> String {
    format!(
        "Step 1: prepare the ingredients for {}.\nStep 2: cook over medium heat.\nStep 3: serve hot.",
        title
    )
}

fn entry(
    title: &str,
    ingredients: &[&str],
    time: &str,
    difficulty: Difficulty,
    image: &str,
) -> Recipe {
    let mut recipe = Recipe::new(title);
    recipe.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
    recipe.time = time.to_string();
    recipe.difficulty = difficulty;
    recipe.image = Some(image.to_string());
    recipe.origin = Origin::Catalog;
    recipe
}

/// The full fallback catalog, tagged [`Origin::Catalog`].
pub fn builtin_catalog() -> Vec<Recipe> {
    vec![
        entry(
            "Chicken Curry with Rice",
            &["chicken", "curry", "rice", "onion", "coconut milk"],
            "30 min",
            Difficulty::Easy,
            "https://www.themealdb.com/images/media/meals/vwrpps1503068729.jpg",
        ),
        entry(
            "Caesar Salad",
            &["lettuce", "chicken", "bread", "parmesan", "caesar dressing"],
            "15 min",
            Difficulty::Easy,
            "https://www.themealdb.com/images/media/meals/llcbn01574260722.jpg",
        ),
        entry(
            "Original Pasta Carbonara",
            &["pasta", "egg", "cheese", "guanciale"],
            "20 min",
            Difficulty::Medium,
            "https://www.themealdb.com/images/media/meals/llcbn01574260722.jpg",
        ),
        entry(
            "Potato Omelette",
            &["egg", "potato", "onion", "olive oil"],
            "40 min",
            Difficulty::Medium,
            "https://www.themealdb.com/images/media/meals/yqwtvu1483387116.jpg",
        ),
        entry(
            "Baked Salmon",
            &["salmon", "lemon", "dill", "olive oil"],
            "25 min",
            Difficulty::Easy,
            "https://www.themealdb.com/images/media/meals/1549542994.jpg",
        ),
    ]
}
