//! Shared test utilities for `StockBuddy`.
//!
//! This module provides helpers for setting up test databases and building inventories
//! with sensible defaults.

use crate::{
    config::seed::{CategoryConfig, Config, load_config},
    core::{inventory::Inventory, seed::seed_categories, stock},
    errors::Result,
    models::{Item, NewItem},
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Operator label used by tests.
pub const TEST_OPERATOR: &str = "测试管理员";

/// Installs a tracing subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Loads the config.toml shipped at the repository root.
pub fn load_repository_config() -> Result<Config> {
    load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml"))
}

/// An inventory with the default categories 玩具, 文具, 教具, 清洁用品 and "Other",
/// and no items.
///
/// # Panics
/// Panics if seeding fails, which only happens on a broken test setup.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn seeded_inventory() -> Inventory {
    let categories: Vec<CategoryConfig> = ["玩具", "文具", "教具", "清洁用品"]
        .into_iter()
        .map(|name| CategoryConfig {
            name: name.to_string(),
            icon: String::new(),
            description: String::new(),
        })
        .collect();

    let mut inventory = Inventory::default();
    seed_categories(&mut inventory, &categories).unwrap();
    inventory
}

/// Identifier of the category called `name`.
///
/// # Panics
/// Panics if no such category exists.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn category_id(inventory: &Inventory, name: &str) -> i64 {
    inventory.category_by_name(name).unwrap().id
}

/// A `NewItem` with a generated id, unit "套" and no description.
#[must_use]
pub fn new_item(name: &str, category_id: i64) -> NewItem {
    NewItem {
        id: None,
        name: name.to_string(),
        category_id,
        unit: "套".to_string(),
        description: String::new(),
    }
}

/// Adds an item in 玩具 and, if `quantity` is non-zero, brings it to that quantity with
/// one inbound movement.
///
/// # Panics
/// Panics if the item cannot be created or stocked.
#[allow(clippy::unwrap_used)]
pub fn stocked_item(inventory: &mut Inventory, name: &str, quantity: u32) -> Item {
    let toys = category_id(inventory, "玩具");
    let item = inventory.add_item(new_item(name, toys)).unwrap();
    if quantity > 0 {
        stock::inbound(inventory, TEST_OPERATOR, &item.id, quantity, "采购", "").unwrap();
    }
    inventory.item(&item.id).cloned().unwrap()
}
