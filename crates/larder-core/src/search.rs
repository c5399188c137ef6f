//! Search merge engine.
//!
//! Combines three candidate sources into one result list: the user's
//! saved recipes, the built-in fallback catalog, and records from the
//! external search service. Results are never persisted here; saving is
//! an explicit action elsewhere.

use crate::catalog::{builtin_catalog, placeholder_instructions};
use crate::models::{Difficulty, Origin, Recipe};
use chrono::Utc;

/// Minimum number of hits the local source pads up to.
pub const MIN_LOCAL_RESULTS: usize = 5;

/// Number of positionally-indexed ingredient fields an external record
/// may carry.
pub const EXTERNAL_INGREDIENT_FIELDS: usize = 20;

/// One search result: a candidate recipe plus a flag telling the
/// consumer whether a recipe with the same title is already saved. The
/// underlying record is never mutated by the annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub recipe: Recipe,
    pub already_saved: bool,
}

/// A raw meal record from the external search collaborator.
///
/// Ingredient fields are positional (1-based, up to
/// [`EXTERNAL_INGREDIENT_FIELDS`]); collection stops at the first
/// absent field, mirroring how the upstream API pads unused slots.
#[derive(Debug, Clone)]
pub struct ExternalMeal {
    pub name: String,
    pub thumb: Option<String>,
    pub instructions: Option<String>,
    ingredients: Vec<Option<String>>,
}

impl ExternalMeal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thumb: None,
            instructions: None,
            ingredients: vec![None; EXTERNAL_INGREDIENT_FIELDS],
        }
    }

    /// Set the 1-based ingredient field `index`.
    pub fn set_ingredient(&mut self, index: usize, value: impl Into<String>) {
        if (1..=EXTERNAL_INGREDIENT_FIELDS).contains(&index) {
            self.ingredients[index - 1] = Some(value.into());
        }
    }

    /// The 1-based ingredient field `index`, if present.
    pub fn ingredient(&self, index: usize) -> Option<&str> {
        if (1..=EXTERNAL_INGREDIENT_FIELDS).contains(&index) {
            self.ingredients[index - 1].as_deref()
        } else {
            None
        }
    }
}

fn split_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn matches_terms(recipe: &Recipe, terms: &[String]) -> bool {
    let title = recipe.title.to_lowercase();
    let ingredients = recipe.joined_ingredients().to_lowercase();
    terms
        .iter()
        .any(|term| title.contains(term) || ingredients.contains(term))
}

/// Search the saved collection and the built-in catalog.
///
/// Saved matches come first, annotated as already saved. Catalog
/// matches follow, minus any entry whose title exactly equals a saved
/// match's title (case-sensitive equality is the dedup key, by design).
/// If fewer than [`MIN_LOCAL_RESULTS`] hits remain, arbitrary further
/// catalog entries pad the list regardless of relevance.
pub fn search_local(query: &str, saved: &[Recipe]) -> Vec<SearchHit> {
    let terms = split_terms(query);

    let saved_hits: Vec<Recipe> = saved
        .iter()
        .filter(|recipe| matches_terms(recipe, &terms))
        .cloned()
        .map(|mut recipe| {
            recipe.origin = Origin::Mine;
            recipe
        })
        .collect();

    let shadowed = |candidate: &Recipe| saved_hits.iter().any(|s| s.title == candidate.title);

    let catalog = builtin_catalog();
    let mut catalog_hits: Vec<Recipe> = catalog
        .iter()
        .filter(|recipe| matches_terms(recipe, &terms))
        .filter(|recipe| !shadowed(recipe))
        .cloned()
        .collect();

    if saved_hits.len() + catalog_hits.len() < MIN_LOCAL_RESULTS {
        for extra in catalog {
            if saved_hits.len() + catalog_hits.len() >= MIN_LOCAL_RESULTS {
                break;
            }
            if shadowed(&extra) || catalog_hits.iter().any(|c| c.title == extra.title) {
                continue;
            }
            catalog_hits.push(extra);
        }
    }

    let mut hits: Vec<SearchHit> = saved_hits
        .into_iter()
        .map(|recipe| SearchHit {
            recipe,
            already_saved: true,
        })
        .collect();
    hits.extend(catalog_hits.into_iter().map(|mut recipe| {
        if recipe.instructions.is_empty() {
            recipe.instructions = placeholder_instructions(&recipe.title);
        }
        SearchHit {
            recipe,
            already_saved: false,
        }
    }));
    hits
}

/// Map external records into the common recipe shape and annotate
/// against the saved collection. An empty input yields an empty list.
pub fn merge_remote(meals: Vec<ExternalMeal>, saved: &[Recipe]) -> Vec<SearchHit> {
    meals
        .into_iter()
        .map(|meal| {
            let mut ingredients = Vec::new();
            for index in 1..=EXTERNAL_INGREDIENT_FIELDS {
                match meal.ingredient(index) {
                    Some(raw) if !raw.trim().is_empty() => {
                        ingredients.push(raw.trim().to_string())
                    }
                    _ => break,
                }
            }

            let difficulty = if ingredients.len() > 8 {
                Difficulty::Hard
            } else {
                Difficulty::Medium
            };

            let already_saved = saved.iter().any(|s| s.title == meal.name);
            let recipe = Recipe {
                id: None,
                title: meal.name,
                ingredients,
                instructions: meal.instructions.unwrap_or_default(),
                time: "45 min".to_string(),
                difficulty,
                image: meal.thumb,
                origin: Origin::Internet,
                created_at: Utc::now(),
            };
            SearchHit {
                recipe,
                already_saved,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_search_pads_to_minimum_without_duplicates() {
        let hits = search_local("chicken, rice", &[]);
        assert_eq!(hits.len(), MIN_LOCAL_RESULTS);
        let mut titles: Vec<_> = hits.iter().map(|h| h.recipe.title.clone()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), MIN_LOCAL_RESULTS);
        assert!(hits.iter().all(|h| !h.already_saved));
        assert!(hits.iter().all(|h| h.recipe.origin == Origin::Catalog));
        assert!(hits.iter().all(|h| !h.recipe.instructions.is_empty()));
    }

    #[test]
    fn test_saved_match_shadows_catalog_entry_with_same_title() {
        let mut mine = Recipe::new("Caesar Salad");
        mine.id = Some("r1".into());
        mine.ingredients = vec!["lettuce".into(), "chicken".into()];

        let hits = search_local("chicken", &[mine]);
        let caesar: Vec<_> = hits
            .iter()
            .filter(|h| h.recipe.title == "Caesar Salad")
            .collect();
        assert_eq!(caesar.len(), 1);
        assert!(caesar[0].already_saved);
        assert_eq!(caesar[0].recipe.origin, Origin::Mine);
    }

    #[test]
    fn test_title_dedup_is_case_sensitive() {
        let mut mine = Recipe::new("caesar salad");
        mine.ingredients = vec!["chicken".into()];

        let hits = search_local("chicken", &[mine]);
        // Lowercase saved title does not shadow the catalog's entry.
        assert!(hits
            .iter()
            .any(|h| h.recipe.title == "Caesar Salad" && !h.already_saved));
        assert!(hits
            .iter()
            .any(|h| h.recipe.title == "caesar salad" && h.already_saved));
    }

    #[test]
    fn test_saved_matches_count_toward_padding_target() {
        let saved: Vec<Recipe> = (0..3)
            .map(|i| {
                let mut r = Recipe::new(format!("Chicken Dish {}", i));
                r.ingredients = vec!["chicken".into()];
                r
            })
            .collect();
        let hits = search_local("chicken", &saved);
        assert_eq!(hits.len(), MIN_LOCAL_RESULTS);
        assert_eq!(hits.iter().filter(|h| h.already_saved).count(), 3);
    }

    #[test]
    fn test_remote_mapping_stops_at_first_absent_ingredient() {
        let mut meal = ExternalMeal::new("Arrabiata");
        meal.set_ingredient(1, "penne");
        meal.set_ingredient(2, "tomato");
        // Slot 3 left absent; slot 4 must be ignored.
        meal.set_ingredient(4, "ghost pepper");
        meal.instructions = Some("Boil pasta.".into());

        let hits = merge_remote(vec![meal], &[]);
        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.recipe.ingredients, vec!["penne", "tomato"]);
        assert_eq!(hit.recipe.difficulty, Difficulty::Medium);
        assert_eq!(hit.recipe.origin, Origin::Internet);
        assert_eq!(hit.recipe.time, "45 min");
        assert!(!hit.already_saved);
    }

    #[test]
    fn test_remote_mapping_estimates_difficulty_from_ingredient_count() {
        let mut meal = ExternalMeal::new("Feast");
        for i in 1..=9 {
            meal.set_ingredient(i, format!("ingredient {}", i));
        }
        let hits = merge_remote(vec![meal], &[]);
        assert_eq!(hits[0].recipe.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_remote_hit_annotated_when_title_already_saved() {
        let saved = vec![Recipe::new("Arrabiata")];
        let hits = merge_remote(vec![ExternalMeal::new("Arrabiata")], &saved);
        assert!(hits[0].already_saved);
        // Annotation only; the mapped record keeps its own identity.
        assert_eq!(hits[0].recipe.id, None);
    }

    #[test]
    fn test_empty_remote_result_stays_empty() {
        assert!(merge_remote(vec![], &[]).is_empty());
    }
}
