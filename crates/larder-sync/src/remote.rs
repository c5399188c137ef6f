//! Collaborator seams for the remote store, identity service and
//! external search.
//!
//! The remote store is an opaque document service: two logical
//! collections under an application namespace, observed through
//! full-snapshot subscriptions (not deltas) and mutated through single
//! document writes or one atomic batch.

use anyhow::Result;
use async_trait::async_trait;
use larder_core::models::{MealPlan, MealPlanEntry, Recipe};
use larder_core::search::ExternalMeal;
use tokio::sync::mpsc;

/// One delivery on a collection subscription.
#[derive(Debug, Clone)]
pub enum SnapshotEvent<T> {
    /// Full replacement contents of the collection.
    Snapshot(T),
    /// Terminal failure of this subscription.
    Error(String),
}

/// A live subscription to one collection.
///
/// Closing (or dropping) the subscription guarantees no further events
/// are observed; the channel is the only delivery path.
#[derive(Debug)]
pub struct Subscription<T> {
    events: mpsc::Receiver<SnapshotEvent<T>>,
}

impl<T> Subscription<T> {
    pub fn new(events: mpsc::Receiver<SnapshotEvent<T>>) -> Self {
        Self { events }
    }

    pub async fn next(&mut self) -> Option<SnapshotEvent<T>> {
        self.events.recv().await
    }

    /// Tear down: no event sent after this call is ever observed.
    pub fn close(&mut self) {
        self.events.close();
    }
}

/// One atomic batch of remote upserts, used by import replay.
#[derive(Debug, Default, Clone)]
pub struct BatchWrite {
    pub recipe_upserts: Vec<(String, Recipe)>,
    pub plan_upserts: Vec<(String, MealPlanEntry)>,
}

impl BatchWrite {
    pub fn is_empty(&self) -> bool {
        self.recipe_upserts.is_empty() && self.plan_upserts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recipe_upserts.len() + self.plan_upserts.len()
    }
}

/// The remote document store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Subscribe to the recipe collection, ordered by creation time
    /// descending. The current contents arrive as the first snapshot.
    async fn subscribe_recipes(&self) -> Result<Subscription<Vec<Recipe>>>;

    /// Subscribe to the meal-plan collection (unordered).
    async fn subscribe_meal_plan(&self) -> Result<Subscription<MealPlan>>;

    /// Create a recipe document; the store assigns the identifier.
    async fn create_recipe(&self, recipe: Recipe) -> Result<()>;

    async fn update_recipe(&self, id: &str, recipe: Recipe) -> Result<()>;

    async fn delete_recipe(&self, id: &str) -> Result<()>;

    /// Upsert a meal-plan entry under its explicit composite key.
    async fn set_plan_entry(&self, key: &str, entry: MealPlanEntry) -> Result<()>;

    async fn delete_plan_entry(&self, key: &str) -> Result<()>;

    /// Apply a batch atomically: either every write lands or none do.
    async fn commit_batch(&self, batch: BatchWrite) -> Result<()>;
}

/// The identity collaborator: anonymous sign-in yielding an opaque id.
#[async_trait]
pub trait Identity: Send + Sync {
    async fn sign_in_anonymously(&self) -> Result<String>;
}

/// The external recipe-search collaborator.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<ExternalMeal>>;
}

/// Placeholder collaborators for running with no remote configured.
/// Sign-in always fails, so the engine settles into offline mode and
/// serves cached state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disconnected;

#[async_trait]
impl Identity for Disconnected {
    async fn sign_in_anonymously(&self) -> Result<String> {
        Err(anyhow::anyhow!("no remote store configured"))
    }
}

#[async_trait]
impl RemoteStore for Disconnected {
    async fn subscribe_recipes(&self) -> Result<Subscription<Vec<Recipe>>> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn subscribe_meal_plan(&self) -> Result<Subscription<MealPlan>> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn create_recipe(&self, _recipe: Recipe) -> Result<()> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn update_recipe(&self, _id: &str, _recipe: Recipe) -> Result<()> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn delete_recipe(&self, _id: &str) -> Result<()> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn set_plan_entry(&self, _key: &str, _entry: MealPlanEntry) -> Result<()> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn delete_plan_entry(&self, _key: &str) -> Result<()> {
        Err(anyhow::anyhow!("no remote store configured"))
    }

    async fn commit_batch(&self, _batch: BatchWrite) -> Result<()> {
        Err(anyhow::anyhow!("no remote store configured"))
    }
}
