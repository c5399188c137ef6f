//! Remote sync engine.
//!
//! One task owns the in-memory collections and the connectivity signal.
//! Remote snapshots, mutations and imports all funnel through its
//! command loop, so the collections and the cache have exactly one
//! writer at any time. Everything user-facing talks to the task through
//! a [`SyncHandle`].
//!
//! Lifecycle: [`SyncEngine::start`] seeds state from the cache, signs
//! in, opens one subscription per collection and spawns the loop.
//! Offline is sticky; the "retry" affordance is a full
//! shutdown-then-start of a fresh engine, not a soft reconnect.

use crate::connectivity::{
    Connectivity, ConnectivityMode, ConnectivityState, REASON_AUTH_OFFLINE,
    REASON_REMOTE_UNREACHABLE,
};
use crate::error::SyncError;
use crate::remote::{BatchWrite, Identity, RemoteStore, SnapshotEvent, Subscription};
use larder_core::cache::CacheStore;
use larder_core::codec;
use larder_core::models::{BackupPayload, MealPlan, MealPlanEntry, Recipe};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

/// Summary of a completed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub recipes: usize,
    pub plan_entries: usize,
    /// Whether the dataset was also replayed to the remote store.
    pub replayed: bool,
}

enum Command {
    Recipes(oneshot::Sender<Vec<Recipe>>),
    MealPlan(oneshot::Sender<MealPlan>),
    CreateRecipe(Recipe, oneshot::Sender<Result<(), SyncError>>),
    UpdateRecipe(String, Recipe, oneshot::Sender<Result<(), SyncError>>),
    DeleteRecipe(String, oneshot::Sender<Result<(), SyncError>>),
    SetPlanEntry(MealPlanEntry, oneshot::Sender<Result<(), SyncError>>),
    RemovePlanEntry(String, oneshot::Sender<Result<(), SyncError>>),
    Import(String, oneshot::Sender<Result<ImportOutcome, SyncError>>),
    Export(oneshot::Sender<Result<String, SyncError>>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable client side of a running engine.
#[derive(Clone)]
pub struct SyncHandle {
    commands: mpsc::Sender<Command>,
    connectivity: watch::Receiver<ConnectivityState>,
}

impl SyncHandle {
    pub fn mode(&self) -> ConnectivityMode {
        self.connectivity.borrow().mode
    }

    /// Human-readable reason for being offline, if any.
    pub fn reason(&self) -> Option<String> {
        self.connectivity.borrow().reason.clone()
    }

    /// Observe connectivity transitions as an event stream.
    pub fn subscribe_connectivity(&self) -> watch::Receiver<ConnectivityState> {
        self.connectivity.clone()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SyncError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| SyncError::Closed)?;
        rx.await.map_err(|_| SyncError::Closed)
    }

    /// Current in-memory recipe collection.
    pub async fn recipes(&self) -> Result<Vec<Recipe>, SyncError> {
        self.request(Command::Recipes).await
    }

    /// Current in-memory meal plan.
    pub async fn meal_plan(&self) -> Result<MealPlan, SyncError> {
        self.request(Command::MealPlan).await
    }

    /// Create a recipe remotely. The store assigns the identifier; it
    /// only becomes visible locally with the next snapshot, so callers
    /// must not expect an id when this returns.
    pub async fn create_recipe(&self, recipe: Recipe) -> Result<(), SyncError> {
        self.request(|tx| Command::CreateRecipe(recipe, tx)).await?
    }

    pub async fn update_recipe(&self, id: String, recipe: Recipe) -> Result<(), SyncError> {
        self.request(|tx| Command::UpdateRecipe(id, recipe, tx))
            .await?
    }

    pub async fn delete_recipe(&self, id: String) -> Result<(), SyncError> {
        self.request(|tx| Command::DeleteRecipe(id, tx)).await?
    }

    pub async fn set_plan_entry(&self, entry: MealPlanEntry) -> Result<(), SyncError> {
        self.request(|tx| Command::SetPlanEntry(entry, tx)).await?
    }

    pub async fn remove_plan_entry(&self, key: String) -> Result<(), SyncError> {
        self.request(|tx| Command::RemovePlanEntry(key, tx)).await?
    }

    /// Merge an externally supplied backup into local state, replaying
    /// it remotely when online. See the module docs for the divergence
    /// semantics on partial failure.
    pub async fn import(&self, raw: impl Into<String>) -> Result<ImportOutcome, SyncError> {
        self.request(|tx| Command::Import(raw.into(), tx)).await?
    }

    /// Encode the current dataset as a portable backup string.
    pub async fn export(&self) -> Result<String, SyncError> {
        self.request(Command::Export).await?
    }

    /// Tear down subscriptions and stop the engine task.
    pub async fn shutdown(&self) -> Result<(), SyncError> {
        self.request(Command::Shutdown).await
    }
}

/// The engine itself; owned by its spawned task after `start`.
pub struct SyncEngine<S: RemoteStore> {
    store: Arc<S>,
    cache: CacheStore,
    connectivity: Connectivity,
    recipes: Vec<Recipe>,
    plan: MealPlan,
}

impl<S: RemoteStore + 'static> SyncEngine<S> {
    /// Boot the subsystem: seed state from the cache (before any remote
    /// connection), attempt anonymous sign-in, open one subscription
    /// per collection, and spawn the event loop. Sign-in failure leaves
    /// the engine alive in offline mode serving local data.
    pub async fn start<I: Identity + ?Sized>(
        store: Arc<S>,
        identity: &I,
        cache: CacheStore,
    ) -> SyncHandle {
        let recipes = cache.load_recipes();
        let plan = cache.load_meal_plan();
        let engine = SyncEngine {
            store,
            cache,
            connectivity: Connectivity::new(),
            recipes,
            plan,
        };

        let (recipe_sub, plan_sub) = match identity.sign_in_anonymously().await {
            Ok(_user) => {
                engine.connectivity.set_online();
                match engine.open_subscriptions().await {
                    Ok((recipes, plan)) => (Some(recipes), Some(plan)),
                    Err(e) => {
                        eprintln!("larder-sync: failed to open subscriptions: {}", e);
                        engine.connectivity.set_offline(REASON_REMOTE_UNREACHABLE);
                        (None, None)
                    }
                }
            }
            Err(e) => {
                eprintln!("larder-sync: sign-in failed, staying offline: {}", e);
                engine.connectivity.set_offline(REASON_AUTH_OFFLINE);
                (None, None)
            }
        };

        let (tx, rx) = mpsc::channel(32);
        let connectivity = engine.connectivity.subscribe();
        tokio::spawn(engine.run(rx, recipe_sub, plan_sub));

        SyncHandle {
            commands: tx,
            connectivity,
        }
    }

    async fn open_subscriptions(
        &self,
    ) -> anyhow::Result<(Subscription<Vec<Recipe>>, Subscription<MealPlan>)> {
        let recipes = self.store.subscribe_recipes().await?;
        let plan = self.store.subscribe_meal_plan().await?;
        Ok((recipes, plan))
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut recipe_sub: Option<Subscription<Vec<Recipe>>>,
        mut plan_sub: Option<Subscription<MealPlan>>,
    ) {
        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        Some(Command::Shutdown(reply)) => {
                            teardown(&mut recipe_sub, &mut plan_sub);
                            let _ = reply.send(());
                            break;
                        }
                        Some(command) => self.handle_command(command).await,
                        None => {
                            // Every handle dropped; nothing left to serve.
                            teardown(&mut recipe_sub, &mut plan_sub);
                            break;
                        }
                    }
                }
                event = next_event(&mut recipe_sub) => {
                    match event {
                        Some(SnapshotEvent::Snapshot(snapshot)) => self.apply_recipes(snapshot),
                        Some(SnapshotEvent::Error(reason)) => {
                            eprintln!("larder-sync: recipe subscription failed: {}", reason);
                            self.demote(&mut recipe_sub, &mut plan_sub);
                        }
                        None => self.demote(&mut recipe_sub, &mut plan_sub),
                    }
                }
                event = next_event(&mut plan_sub) => {
                    match event {
                        Some(SnapshotEvent::Snapshot(snapshot)) => self.apply_plan(snapshot),
                        Some(SnapshotEvent::Error(reason)) => {
                            eprintln!("larder-sync: meal-plan subscription failed: {}", reason);
                            self.demote(&mut recipe_sub, &mut plan_sub);
                        }
                        None => self.demote(&mut recipe_sub, &mut plan_sub),
                    }
                }
            }
        }
    }

    /// A snapshot replaces the whole collection, then mirrors into the
    /// cache, then clears any data-layer error. Never partial.
    fn apply_recipes(&mut self, snapshot: Vec<Recipe>) {
        self.recipes = snapshot;
        self.cache.save_recipes(&self.recipes);
        self.connectivity.clear_reason();
    }

    fn apply_plan(&mut self, snapshot: MealPlan) {
        self.plan = snapshot;
        self.cache.save_meal_plan(&self.plan);
        self.connectivity.clear_reason();
    }

    /// A subscription error is terminal: flip to offline and tear both
    /// subscriptions down so no further callbacks are observed. The
    /// last-good cache stays as the visible state.
    fn demote(
        &mut self,
        recipe_sub: &mut Option<Subscription<Vec<Recipe>>>,
        plan_sub: &mut Option<Subscription<MealPlan>>,
    ) {
        self.connectivity.set_offline(REASON_REMOTE_UNREACHABLE);
        teardown(recipe_sub, plan_sub);
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Recipes(reply) => {
                let _ = reply.send(self.recipes.clone());
            }
            Command::MealPlan(reply) => {
                let _ = reply.send(self.plan.clone());
            }
            Command::CreateRecipe(recipe, reply) => {
                let _ = reply.send(self.create_recipe(recipe).await);
            }
            Command::UpdateRecipe(id, recipe, reply) => {
                let _ = reply.send(self.update_recipe(&id, recipe).await);
            }
            Command::DeleteRecipe(id, reply) => {
                let _ = reply.send(self.delete_recipe(&id).await);
            }
            Command::SetPlanEntry(entry, reply) => {
                let _ = reply.send(self.set_plan_entry(entry).await);
            }
            Command::RemovePlanEntry(key, reply) => {
                let _ = reply.send(self.remove_plan_entry(&key).await);
            }
            Command::Import(raw, reply) => {
                let _ = reply.send(self.import(&raw).await);
            }
            Command::Export(reply) => {
                let _ = reply.send(self.export());
            }
            // Shutdown is intercepted by the run loop.
            Command::Shutdown(reply) => {
                let _ = reply.send(());
            }
        }
    }

    fn ensure_online(&self) -> Result<(), SyncError> {
        match self.connectivity.mode() {
            ConnectivityMode::Online => Ok(()),
            ConnectivityMode::Offline => Err(SyncError::Offline),
        }
    }

    async fn create_recipe(&self, mut recipe: Recipe) -> Result<(), SyncError> {
        self.ensure_online()?;
        // The store assigns the identifier; it arrives with the next
        // snapshot. No optimistic local change.
        recipe.id = None;
        self.store
            .create_recipe(recipe)
            .await
            .map_err(|e| SyncError::RemoteWrite(e.to_string()))
    }

    async fn update_recipe(&self, id: &str, recipe: Recipe) -> Result<(), SyncError> {
        self.ensure_online()?;
        self.store
            .update_recipe(id, recipe)
            .await
            .map_err(|e| SyncError::RemoteWrite(e.to_string()))
    }

    async fn delete_recipe(&self, id: &str) -> Result<(), SyncError> {
        self.ensure_online()?;
        self.store
            .delete_recipe(id)
            .await
            .map_err(|e| SyncError::RemoteWrite(e.to_string()))
    }

    async fn set_plan_entry(&self, entry: MealPlanEntry) -> Result<(), SyncError> {
        self.ensure_online()?;
        let key = entry.key().to_string();
        self.store
            .set_plan_entry(&key, entry)
            .await
            .map_err(|e| SyncError::RemoteWrite(e.to_string()))
    }

    async fn remove_plan_entry(&self, key: &str) -> Result<(), SyncError> {
        self.ensure_online()?;
        self.store
            .delete_plan_entry(key)
            .await
            .map_err(|e| SyncError::RemoteWrite(e.to_string()))
    }

    /// Import reconciler. Decodes (with plain-JSON fallback), validates
    /// shape, overwrites local state unconditionally, and replays the
    /// dataset as one atomic batch when online. If the batch fails the
    /// local overwrite stands; local and remote may diverge until the
    /// user retries.
    async fn import(&mut self, raw: &str) -> Result<ImportOutcome, SyncError> {
        let trimmed = raw.trim();
        let text = codec::decode_text(trimmed).unwrap_or_else(|| trimmed.to_string());
        let payload: BackupPayload =
            serde_json::from_str(&text).map_err(|e| SyncError::InvalidImport(e.to_string()))?;

        self.recipes = payload.recipes;
        self.plan = payload.meal_plan;
        self.cache.save_recipes(&self.recipes);
        self.cache.save_meal_plan(&self.plan);

        let replayed = if self.connectivity.mode() == ConnectivityMode::Online {
            let batch = self.replay_batch();
            self.store
                .commit_batch(batch)
                .await
                .map_err(|e| SyncError::RemoteWrite(e.to_string()))?;
            true
        } else {
            false
        };

        Ok(ImportOutcome {
            recipes: self.recipes.len(),
            plan_entries: self.plan.len(),
            replayed,
        })
    }

    /// Build the batch replaying the imported dataset: every recipe
    /// upserted (fresh id when none), every plan entry upserted by its
    /// composite key.
    fn replay_batch(&self) -> BatchWrite {
        let mut batch = BatchWrite::default();
        for recipe in &self.recipes {
            let mut doc = recipe.clone();
            let id = doc
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            doc.id = Some(id.clone());
            batch.recipe_upserts.push((id, doc));
        }
        for (key, entry) in &self.plan {
            batch.plan_upserts.push((key.clone(), entry.clone()));
        }
        batch
    }

    fn export(&self) -> Result<String, SyncError> {
        let payload = BackupPayload::snapshot(self.recipes.clone(), self.plan.clone());
        codec::encode(&payload).map_err(|e| SyncError::Export(e.to_string()))
    }
}

fn teardown(
    recipe_sub: &mut Option<Subscription<Vec<Recipe>>>,
    plan_sub: &mut Option<Subscription<MealPlan>>,
) {
    if let Some(mut sub) = recipe_sub.take() {
        sub.close();
    }
    if let Some(mut sub) = plan_sub.take() {
        sub.close();
    }
}

async fn next_event<T>(sub: &mut Option<Subscription<T>>) -> Option<SnapshotEvent<T>> {
    match sub {
        Some(active) => active.next().await,
        None => std::future::pending().await,
    }
}
