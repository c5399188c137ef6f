pub mod plan;
pub mod recipe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use plan::{MealPlan, MealPlanEntry, MealSlot, PlanKey, PlanKeyError};
pub use recipe::{normalize_ingredients, Difficulty, Origin, Recipe};

/// Current backup format version. Imports never reject on version; the
/// field exists so future readers can branch if they must.
pub const BACKUP_VERSION: u32 = 1;

fn default_backup_version() -> u32 {
    BACKUP_VERSION
}

/// Everything the application owns, in one portable document.
///
/// `recipes` and `mealPlan` carry no serde defaults on purpose: their
/// absence is the one structural error the import path reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub recipes: Vec<Recipe>,
    pub meal_plan: MealPlan,

    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,

    #[serde(default = "default_backup_version")]
    pub version: u32,
}

impl BackupPayload {
    /// Snapshot the given state into a payload stamped with the current
    /// time and format version.
    pub fn snapshot(recipes: Vec<Recipe>, meal_plan: MealPlan) -> Self {
        Self {
            recipes,
            meal_plan,
            generated_at: Utc::now(),
            version: BACKUP_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_requires_both_collections() {
        let missing_plan = r#"{"recipes":[]}"#;
        assert!(serde_json::from_str::<BackupPayload>(missing_plan).is_err());

        let missing_recipes = r#"{"mealPlan":{}}"#;
        assert!(serde_json::from_str::<BackupPayload>(missing_recipes).is_err());

        let minimal = r#"{"recipes":[],"mealPlan":{}}"#;
        let payload = serde_json::from_str::<BackupPayload>(minimal).unwrap();
        assert_eq!(payload.version, BACKUP_VERSION);
    }

    #[test]
    fn test_unknown_version_is_accepted() {
        let future = r#"{"recipes":[],"mealPlan":{},"version":99}"#;
        let payload = serde_json::from_str::<BackupPayload>(future).unwrap();
        assert_eq!(payload.version, 99);
    }
}
