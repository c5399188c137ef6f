//! Local cache store.
//!
//! Two fixed slots, one per managed collection, written as JSON files
//! under the application data directory. The cache is a shadow of the
//! last-known-good remote snapshot and is what the application renders
//! when the remote store is unreachable. Reads never fail visibly:
//! missing or corrupt slots come back as empty defaults. Writes are
//! best-effort; a full disk never takes the session down.

use crate::models::{MealPlan, Recipe};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// The datasets the cache manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Recipes,
    MealPlan,
}

impl Dataset {
    pub fn slot(self) -> &'static str {
        match self {
            Dataset::Recipes => "recipes",
            Dataset::MealPlan => "mealplan",
        }
    }
}

/// File-backed cache with one last-write-wins slot per dataset.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Open a cache rooted at `dir`, creating the directory best-effort.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let _ = fs::create_dir_all(&dir);
        Self { dir }
    }

    fn slot_path(&self, dataset: Dataset) -> PathBuf {
        self.dir.join(format!("larder_{}.json", dataset.slot()))
    }

    /// Last cached recipe collection, or empty on first run / corruption.
    pub fn load_recipes(&self) -> Vec<Recipe> {
        self.load_slot(Dataset::Recipes)
    }

    /// Last cached meal plan, or empty on first run / corruption.
    pub fn load_meal_plan(&self) -> MealPlan {
        self.load_slot(Dataset::MealPlan)
    }

    pub fn save_recipes(&self, recipes: &[Recipe]) {
        self.save_slot(Dataset::Recipes, &recipes);
    }

    pub fn save_meal_plan(&self, plan: &MealPlan) {
        self.save_slot(Dataset::MealPlan, plan);
    }

    fn load_slot<T: DeserializeOwned + Default>(&self, dataset: Dataset) -> T {
        read_json(&self.slot_path(dataset)).unwrap_or_default()
    }

    fn save_slot<T: Serialize>(&self, dataset: Dataset, value: &T) {
        let path = self.slot_path(dataset);
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                if let Err(e) = fs::write(&path, bytes) {
                    // Best-effort by contract; in-memory state stays authoritative.
                    eprintln!("WARNING: Failed to write cache slot {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                eprintln!("WARNING: Failed to serialize cache slot {}: {}", path.display(), e);
            }
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = fs::read(path).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealPlanEntry, MealSlot};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_missing_slots_load_as_empty_defaults() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path());
        assert!(cache.load_recipes().is_empty());
        assert!(cache.load_meal_plan().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path());

        let mut recipe = Recipe::new("Gazpacho");
        recipe.ingredients = vec!["tomato".into(), "cucumber".into()];
        cache.save_recipes(std::slice::from_ref(&recipe));

        let date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let entry = MealPlanEntry::new(date, MealSlot::Second, "Gazpacho");
        let mut plan = MealPlan::new();
        plan.insert(entry.key().to_string(), entry.clone());
        cache.save_meal_plan(&plan);

        assert_eq!(cache.load_recipes(), vec![recipe]);
        assert_eq!(cache.load_meal_plan().get(&entry.key().to_string()), Some(&entry));
    }

    #[test]
    fn test_corrupt_slot_loads_as_empty_default() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path());
        std::fs::write(dir.path().join("larder_recipes.json"), b"{not json").unwrap();
        assert!(cache.load_recipes().is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::open(dir.path());
        cache.save_recipes(&[Recipe::new("First")]);
        cache.save_recipes(&[Recipe::new("Second")]);
        let loaded = cache.load_recipes();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Second");
    }
}
