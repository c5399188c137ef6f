pub mod cache;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod models;
pub mod search;

// Re-export commonly used types and functions
pub use cache::{CacheStore, Dataset};
pub use config::Config;
pub use models::{
    BackupPayload, Difficulty, MealPlan, MealPlanEntry, MealSlot, Origin, PlanKey, Recipe,
};
pub use search::{ExternalMeal, SearchHit};
