use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// How demanding a recipe is to cook.
///
/// Stored as a plain string on the wire; anything we do not recognize
/// (old exports, hand-edited backups) collapses to `Medium` instead of
/// failing the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        write!(f, "{}", label)
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "Easy" => Difficulty::Easy,
            "Hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        })
    }
}

/// Where a recipe record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Authored or saved by the user; the only origin that persists remotely.
    Mine,
    /// One of the built-in fallback entries.
    Catalog,
    /// Mapped from an external search result.
    Internet,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Mine
    }
}

/// A single recipe.
///
/// `id` is assigned by the remote store and is therefore absent on
/// ephemeral search candidates and on freshly created recipes until the
/// next snapshot arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Remote document id, present only once persisted remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Non-empty display title.
    pub title: String,

    /// Ordered ingredient list. Older exports stored this as one
    /// comma-delimited string; both shapes normalize to trimmed entries.
    #[serde(deserialize_with = "deserialize_ingredients")]
    pub ingredients: Vec<String>,

    /// Free-form preparation text.
    #[serde(default)]
    pub instructions: String,

    /// Human-readable time label, e.g. "30 min".
    #[serde(default)]
    pub time: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Optional image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub origin: Origin,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a self-authored recipe with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            ingredients: vec![],
            instructions: String::new(),
            time: String::new(),
            difficulty: Difficulty::default(),
            image: None,
            origin: Origin::Mine,
            created_at: Utc::now(),
        }
    }

    /// Ingredient text joined for substring matching.
    pub fn joined_ingredients(&self) -> String {
        self.ingredients.join(" ")
    }
}

/// Normalize a comma-delimited ingredient string into trimmed entries.
pub fn normalize_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn deserialize_ingredients<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIngredients {
        List(Vec<String>),
        Delimited(String),
    }

    Ok(match RawIngredients::deserialize(deserializer)? {
        RawIngredients::List(items) => items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        RawIngredients::Delimited(raw) => normalize_ingredients(&raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_difficulty_falls_back_to_medium() {
        let parsed: Difficulty = serde_json::from_str("\"Fiendish\"").unwrap();
        assert_eq!(parsed, Difficulty::Medium);
        let parsed: Difficulty = serde_json::from_str("\"Hard\"").unwrap();
        assert_eq!(parsed, Difficulty::Hard);
    }

    #[test]
    fn test_ingredients_accept_list_and_delimited_string() {
        let from_list: Recipe = serde_json::from_str(
            r#"{"title":"Soup","ingredients":[" leek ","potato",""]}"#,
        )
        .unwrap();
        assert_eq!(from_list.ingredients, vec!["leek", "potato"]);

        let from_string: Recipe =
            serde_json::from_str(r#"{"title":"Soup","ingredients":"leek, potato , salt"}"#)
                .unwrap();
        assert_eq!(from_string.ingredients, vec!["leek", "potato", "salt"]);
    }

    #[test]
    fn test_recipe_defaults_tolerate_sparse_documents() {
        let recipe: Recipe =
            serde_json::from_str(r#"{"title":"Toast","ingredients":["bread"]}"#).unwrap();
        assert_eq!(recipe.id, None);
        assert_eq!(recipe.origin, Origin::Mine);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert!(recipe.instructions.is_empty());
    }
}
