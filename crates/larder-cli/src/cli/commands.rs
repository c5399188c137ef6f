use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use larder_core::models::{MealPlan, MealSlot, Origin, PlanKey, Recipe};
use larder_core::{search, CacheStore, Config};
use larder_sync::remote::SearchProvider;
use larder_sync::{Disconnected, MealDbClient, SyncEngine, SyncHandle};
use std::path::Path;
use std::sync::Arc;

/// Days the planner view covers, starting today.
const PLANNER_DAYS: i64 = 14;

/// Boot an engine over the local cache. With no remote configured the
/// engine comes up offline and serves cached data, which is all the CLI
/// needs.
async fn start_engine() -> Result<SyncHandle> {
    let config = Config::load()?;
    let cache = CacheStore::open(config.resolve_data_dir()?);
    Ok(SyncEngine::start(Arc::new(Disconnected), &Disconnected, cache).await)
}

fn origin_label(origin: Origin) -> &'static str {
    match origin {
        Origin::Mine => "saved",
        Origin::Catalog => "catalog",
        Origin::Internet => "internet",
    }
}

/// Handle the 'recipes' command
pub async fn list_recipes(json: bool) -> Result<()> {
    let handle = start_engine().await?;
    let recipes = handle.recipes().await?;

    if json {
        println!("{}", serde_json::to_string(&recipes)?);
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes yet. Restore a backup with 'larder import <data>'");
        return Ok(());
    }

    println!("Saved recipes:");
    for recipe in &recipes {
        let time = if recipe.time.is_empty() {
            "time n/a"
        } else {
            recipe.time.as_str()
        };
        println!(
            "  {} ({}, {}, {} ingredients)",
            recipe.title,
            recipe.difficulty,
            time,
            recipe.ingredients.len()
        );
    }

    Ok(())
}

/// Handle the 'plan' command: render the planner window day by day
pub async fn show_plan(json: bool) -> Result<()> {
    let handle = start_engine().await?;
    let plan = handle.meal_plan().await?;

    if json {
        println!("{}", serde_json::to_string(&plan)?);
        return Ok(());
    }

    let today = Local::now().date_naive();
    println!("Meal plan for the next {} days:", PLANNER_DAYS);
    for offset in 0..PLANNER_DAYS {
        let date = today + Duration::days(offset);
        println!(
            "  {}  first: {:<28} second: {}",
            date.format("%a %Y-%m-%d"),
            slot_title(&plan, date, MealSlot::First),
            slot_title(&plan, date, MealSlot::Second)
        );
    }

    Ok(())
}

fn slot_title(plan: &MealPlan, date: NaiveDate, slot: MealSlot) -> String {
    plan.get(&PlanKey::new(date, slot).to_string())
        .map(|entry| entry.recipe_title.clone())
        .unwrap_or_else(|| "-".to_string())
}

/// Handle the 'export' command
pub async fn export_backup() -> Result<()> {
    let handle = start_engine().await?;
    println!("{}", handle.export().await?);
    Ok(())
}

/// Handle the 'import' command. Accepts the backup inline or as a path
/// to a file holding it.
pub async fn import_backup(data: &str, json: bool) -> Result<()> {
    let raw = if Path::new(data).is_file() {
        std::fs::read_to_string(data)
            .with_context(|| format!("Failed to read backup file: {}", data))?
    } else {
        data.to_string()
    };

    let handle = start_engine().await?;
    let outcome = handle.import(raw).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "recipes": outcome.recipes,
                "planEntries": outcome.plan_entries,
                "replayed": outcome.replayed,
            })
        );
        return Ok(());
    }

    println!(
        "Imported {} recipes and {} plan entries.",
        outcome.recipes, outcome.plan_entries
    );
    if !outcome.replayed {
        println!("Offline: the restored data was saved locally only.");
    }

    Ok(())
}

/// Handle the 'search' command: local merge first, external results
/// appended when requested.
pub async fn search(query: &str, remote: bool, json: bool) -> Result<()> {
    let config = Config::load()?;
    let cache = CacheStore::open(config.resolve_data_dir()?);
    let saved = cache.load_recipes();

    let mut hits = search::search_local(query, &saved);
    if remote {
        let client = MealDbClient::new(config.search.api_url.clone());
        match client.search(query).await {
            Ok(meals) => hits.extend(search::merge_remote(meals, &saved)),
            Err(e) => eprintln!("WARNING: external search failed: {}", e),
        }
    }

    if json {
        let recipes: Vec<&Recipe> = hits.iter().map(|hit| &hit.recipe).collect();
        println!("{}", serde_json::to_string(&recipes)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for hit in &hits {
        let marker = if hit.already_saved { "*" } else { " " };
        println!(
            " {} {} [{}] {}",
            marker,
            hit.recipe.title,
            origin_label(hit.recipe.origin),
            hit.recipe.time
        );
    }
    println!("(* already in your recipe box)");

    Ok(())
}
