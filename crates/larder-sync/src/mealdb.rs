//! TheMealDB-style client for the external search collaborator.

use crate::remote::SearchProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use larder_core::search::{ExternalMeal, EXTERNAL_INGREDIENT_FIELDS};
use serde::Deserialize;
use std::collections::HashMap;

/// Public endpoint used when the config names no other.
pub const DEFAULT_API_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Keyword-search client against a TheMealDB-compatible API.
pub struct MealDbClient {
    http: reqwest::Client,
    base_url: String,
}

/// The API answers `{"meals": null}` when nothing matches.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    meals: Option<Vec<RawMeal>>,
}

#[derive(Debug, Deserialize)]
struct RawMeal {
    #[serde(rename = "strMeal")]
    name: String,
    #[serde(rename = "strMealThumb")]
    thumb: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    /// Everything else, including the 20 positional strIngredientN
    /// fields. TheMealDB serves every field as string-or-null.
    #[serde(flatten)]
    rest: HashMap<String, Option<String>>,
}

impl From<RawMeal> for ExternalMeal {
    fn from(raw: RawMeal) -> Self {
        let mut meal = ExternalMeal::new(raw.name);
        meal.thumb = raw.thumb;
        meal.instructions = raw.instructions;
        for index in 1..=EXTERNAL_INGREDIENT_FIELDS {
            if let Some(Some(value)) = raw.rest.get(&format!("strIngredient{}", index)) {
                meal.set_ingredient(index, value.clone());
            }
        }
        meal
    }
}

impl MealDbClient {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

#[async_trait]
impl SearchProvider for MealDbClient {
    async fn search(&self, query: &str) -> Result<Vec<ExternalMeal>> {
        let url = format!("{}/search.php", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(&url)
            .query(&[("s", query)])
            .send()
            .await
            .context("Search request failed")?
            .error_for_status()
            .context("Search request rejected")?;

        let parsed: SearchResponse = response
            .json()
            .await
            .context("Failed to parse search response")?;

        Ok(parsed
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(ExternalMeal::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_meal_maps_positional_ingredient_fields() {
        let json = r#"{
            "idMeal": "52771",
            "strMeal": "Spicy Arrabiata Penne",
            "strMealThumb": "https://example.test/penne.jpg",
            "strInstructions": "Bring a pot of water to the boil.",
            "strIngredient1": "penne rigate",
            "strIngredient2": "olive oil",
            "strIngredient3": "garlic",
            "strIngredient4": "",
            "strIngredient5": null
        }"#;
        let raw: RawMeal = serde_json::from_str(json).unwrap();
        let meal = ExternalMeal::from(raw);

        assert_eq!(meal.name, "Spicy Arrabiata Penne");
        assert_eq!(meal.thumb.as_deref(), Some("https://example.test/penne.jpg"));
        assert_eq!(meal.ingredient(1), Some("penne rigate"));
        assert_eq!(meal.ingredient(3), Some("garlic"));
        // Blank slot 4 is preserved as-is; the merge engine treats it
        // as the cutoff.
        assert_eq!(meal.ingredient(4), Some(""));
        assert_eq!(meal.ingredient(5), None);
    }

    #[test]
    fn test_null_meals_parse_as_empty() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"meals":null}"#).unwrap();
        assert!(parsed.meals.is_none());
    }
}
