//! Tracker - the entry point a presentation layer talks to.
//!
//! The tracker owns the inventory and the database connection. Every mutating call runs
//! the core operation against a working copy, writes the affected collections inside one
//! database transaction, and only then swaps the working copy in. A rejected operation or
//! a failed write leaves both memory and storage as they were.

use crate::{
    config::seed::Config,
    core::{
        category::{self, CategoryDeletion},
        inventory::Inventory,
        persistence::{self, Collection},
        seed, stock,
        view::{self, CategoryStats, InventorySummary},
    },
    errors::Result,
    models::{Category, Item, ItemDetails, Movement, MovementType, NewItem},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{error, info, warn};

/// Inventory tracker with write-through persistence.
#[derive(Debug)]
pub struct Tracker {
    db: DatabaseConnection,
    inventory: Inventory,
    operator: String,
    max_quick_quantity: u32,
}

impl Tracker {
    /// Loads the stored collections, seeding whatever is missing, and saves the seeded
    /// collections right away.
    pub async fn open(db: DatabaseConnection, config: &Config, operator: String) -> Result<Self> {
        let stored = persistence::load_all(&db).await?;
        let outcome = seed::load_or_seed(stored, config)?;

        if !outcome.dirty.is_empty() {
            let txn = db.begin().await?;
            persistence::save_collections(&txn, &outcome.inventory, &outcome.dirty).await?;
            txn.commit().await?;
            info!(collections = ?outcome.dirty, "Seeded collections saved");
        }

        info!(
            items = outcome.inventory.items().len(),
            categories = outcome.inventory.categories().len(),
            movements = outcome.inventory.movements().len(),
            "Inventory loaded"
        );

        Ok(Self {
            db,
            inventory: outcome.inventory,
            operator,
            max_quick_quantity: config.stock.max_quick_quantity,
        })
    }

    /// Read access to the current inventory.
    #[must_use]
    pub const fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Label stamped on every movement.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Creates an item with quantity 0.
    pub async fn add_item(&mut self, new_item: NewItem) -> Result<Item> {
        self.apply(&[Collection::Items], |inventory| inventory.add_item(new_item))
            .await
    }

    /// Edits an item's descriptive fields.
    pub async fn update_item(&mut self, id: &str, details: ItemDetails) -> Result<Item> {
        self.apply(&[Collection::Items], |inventory| {
            inventory.update_item(id, details)
        })
        .await
    }

    /// Hard-deletes an item. Its movements stay in the ledger.
    pub async fn delete_item(&mut self, id: &str) -> Result<Item> {
        self.apply(&[Collection::Items], |inventory| inventory.delete_item(id))
            .await
    }

    /// Receives stock for an item.
    pub async fn inbound(
        &mut self,
        item_id: &str,
        quantity: u32,
        reason: &str,
        note: &str,
    ) -> Result<Movement> {
        let operator = self.operator.clone();
        self.apply(&[Collection::Items, Collection::Movements], |inventory| {
            stock::inbound(inventory, &operator, item_id, quantity, reason, note)
        })
        .await
    }

    /// Hands stock out to a class.
    pub async fn outbound(
        &mut self,
        item_id: &str,
        quantity: u32,
        class_name: &str,
        teacher: &str,
        note: &str,
    ) -> Result<Movement> {
        let operator = self.operator.clone();
        self.apply(&[Collection::Items, Collection::Movements], |inventory| {
            stock::outbound(
                inventory, &operator, item_id, quantity, class_name, teacher, note,
            )
        })
        .await
    }

    /// Quick inbound from a free-text prompt. `Ok(None)` means the input was ignored
    /// and nothing was written.
    pub async fn quick_inbound(&mut self, item_id: &str, input: &str) -> Result<Option<Movement>> {
        let mut working = self.inventory.clone();
        let movement = stock::quick_inbound(
            &mut working,
            &self.operator,
            item_id,
            input,
            self.max_quick_quantity,
        )
        .inspect_err(log_rejection)?;

        if movement.is_some() {
            self.commit(working, &[Collection::Items, Collection::Movements])
                .await?;
        }
        Ok(movement)
    }

    /// Quick outbound from a free-text prompt. `Ok(None)` means the input was ignored
    /// and nothing was written.
    pub async fn quick_outbound(&mut self, item_id: &str, input: &str) -> Result<Option<Movement>> {
        let mut working = self.inventory.clone();
        let movement = stock::quick_outbound(
            &mut working,
            &self.operator,
            item_id,
            input,
            self.max_quick_quantity,
        )
        .inspect_err(log_rejection)?;

        if movement.is_some() {
            self.commit(working, &[Collection::Items, Collection::Movements])
                .await?;
        }
        Ok(movement)
    }

    /// Creates a non-default category.
    pub async fn add_category(
        &mut self,
        name: &str,
        icon: &str,
        description: &str,
    ) -> Result<Category> {
        self.apply(&[Collection::Categories], |inventory| {
            category::add_category(inventory, name, icon, description)
        })
        .await
    }

    /// Renames a category and replaces its icon and description.
    pub async fn edit_category(
        &mut self,
        id: i64,
        name: &str,
        icon: &str,
        description: &str,
    ) -> Result<Category> {
        self.apply(&[Collection::Categories], |inventory| {
            category::edit_category(inventory, id, name, icon, description)
        })
        .await
    }

    /// Number of items that would be reassigned if the category were deleted.
    #[must_use]
    pub fn dependent_item_count(&self, id: i64) -> usize {
        category::dependent_item_count(&self.inventory, id)
    }

    /// Deletes a non-default category, moving its items to "Other".
    pub async fn delete_category(&mut self, id: i64) -> Result<CategoryDeletion> {
        self.apply(&[Collection::Items, Collection::Categories], |inventory| {
            category::delete_category(inventory, id)
        })
        .await
    }

    /// Items matching a search term and optional category.
    #[must_use]
    pub fn filter_inventory(&self, search_term: &str, category_filter: Option<i64>) -> Vec<&Item> {
        view::filter_inventory(self.inventory.items(), search_term, category_filter)
    }

    /// Movements matching an optional type and local calendar day.
    #[must_use]
    pub fn filter_records(
        &self,
        type_filter: Option<MovementType>,
        date_filter: Option<NaiveDate>,
    ) -> Vec<&Movement> {
        view::filter_records(self.inventory.movements(), type_filter, date_filter)
    }

    /// Per-category item counts and quantities.
    #[must_use]
    pub fn category_stats(&self) -> Vec<CategoryStats> {
        view::category_stats(self.inventory.items(), self.inventory.categories())
    }

    /// Headline numbers for the whole inventory.
    #[must_use]
    pub fn summary(&self) -> InventorySummary {
        view::inventory_summary(self.inventory.items())
    }

    /// Runs `operation` on a working copy and commits it if it succeeds.
    async fn apply<T, F>(&mut self, collections: &[Collection], operation: F) -> Result<T>
    where
        F: FnOnce(&mut Inventory) -> Result<T>,
    {
        let mut working = self.inventory.clone();
        let output = operation(&mut working).inspect_err(log_rejection)?;
        self.commit(working, collections).await?;
        Ok(output)
    }

    /// Writes `collections` of `working` in one transaction, then makes it current.
    async fn commit(&mut self, working: Inventory, collections: &[Collection]) -> Result<()> {
        let txn = self.db.begin().await?;
        persistence::save_collections(&txn, &working, collections)
            .await
            .inspect_err(|e| error!("Failed to save {:?}: {}", collections, e))?;
        txn.commit().await?;

        self.inventory = working;
        Ok(())
    }
}

fn log_rejection(e: &crate::errors::Error) {
    if e.is_user_facing() {
        warn!("Operation rejected: {}", e);
    } else {
        error!("Operation failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        config::seed::parse_config,
        core::view::{StockStatus, stock_status},
        errors::Error,
        models::FALLBACK_CATEGORY_NAME,
        test_utils::*,
    };

    async fn open_sample_tracker() -> Result<Tracker> {
        let db = setup_test_db().await?;
        let config = load_repository_config()?;
        Tracker::open(db, &config, TEST_OPERATOR.to_string()).await
    }

    async fn reopen(tracker: Tracker) -> Result<Tracker> {
        let config = load_repository_config()?;
        Tracker::open(tracker.db, &config, TEST_OPERATOR.to_string()).await
    }

    #[tokio::test]
    async fn test_open_seeds_sample_data() -> Result<()> {
        let tracker = open_sample_tracker().await?;

        assert_eq!(tracker.inventory().items().len(), 4);
        assert_eq!(tracker.inventory().item("001").unwrap().quantity, 15);
        assert!(tracker.inventory().fallback_category().is_some());
        assert!(tracker.inventory().movements().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_outbound_scenario_persists() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;

        let movement = tracker.outbound("001", 15, "大一班", "王老师", "").await?;
        assert_eq!(movement.quantity, 15);

        let tracker = reopen(tracker).await?;
        let quantity = tracker.inventory().item("001").unwrap().quantity;
        assert_eq!(quantity, 0);
        assert_eq!(stock_status(quantity), StockStatus::OutOfStock);
        assert_eq!(tracker.inventory().movements(), &[movement]);

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_outbound_changes_nothing() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;
        tracker.outbound("001", 15, "大一班", "王老师", "").await?;
        let before = tracker.inventory().clone();

        let result = tracker.outbound("001", 1, "大一班", "王老师", "").await;
        let error = result.unwrap_err();
        assert!(matches!(error, Error::InsufficientStock { .. }));
        assert_eq!(error.deficit(), Some(1));
        assert_eq!(tracker.inventory(), &before);

        let tracker = reopen(tracker).await?;
        assert_eq!(tracker.inventory(), &before);

        Ok(())
    }

    #[tokio::test]
    async fn test_inbound_unknown_item() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;

        let result = tracker.inbound("999", 3, "采购", "").await;
        assert!(matches!(result.unwrap_err(), Error::ItemNotFound { .. }));
        assert!(tracker.inventory().movements().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_quick_operations() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;

        assert!(tracker.quick_inbound("002", "abc").await?.is_none());
        assert!(tracker.quick_inbound("002", "4").await?.is_some());
        assert!(tracker.quick_outbound("002", "2").await?.is_some());

        let tracker = reopen(tracker).await?;
        assert_eq!(tracker.inventory().item("002").unwrap().quantity, 10);
        assert_eq!(tracker.inventory().movements().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_quick_quantity_above_limit() -> Result<()> {
        let db = setup_test_db().await?;
        let config = parse_config(
            r#"
            [stock]
            max_quick_quantity = 10

            [[sample_items]]
            id = "001"
            name = "积木玩具"
            category = "玩具"
            unit = "套"
            "#,
        )?;
        let mut tracker = Tracker::open(db, &config, TEST_OPERATOR.to_string()).await?;

        let result = tracker.quick_inbound("001", "11").await;
        assert!(matches!(result.unwrap_err(), Error::InvalidQuantity { quantity: 11 }));

        Ok(())
    }

    #[tokio::test]
    async fn test_category_lifecycle_persists() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;

        let crafts = tracker.add_category("手工", "✂️", "美工课").await?;
        let glue = tracker
            .add_item(NewItem {
                name: "胶水".to_string(),
                category_id: crafts.id,
                unit: "瓶".to_string(),
                ..Default::default()
            })
            .await?;
        assert_eq!(glue.id, "005");

        tracker.edit_category(crafts.id, "美工材料", "🎨", "").await?;
        assert_eq!(tracker.dependent_item_count(crafts.id), 1);

        let deletion = tracker.delete_category(crafts.id).await?;
        assert_eq!(deletion.reassigned_items, 1);

        let tracker = reopen(tracker).await?;
        let glue = tracker.inventory().item(&glue.id).unwrap();
        assert_eq!(
            tracker.inventory().category_name_of(glue),
            FALLBACK_CATEGORY_NAME
        );
        assert!(tracker.inventory().category(crafts.id).is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_category_rejected() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;
        let before = tracker.inventory().categories().len();

        let result = tracker.add_category("玩具", "🧸", "").await;
        assert!(matches!(result.unwrap_err(), Error::DuplicateName { .. }));
        assert_eq!(tracker.inventory().categories().len(), before);

        Ok(())
    }

    #[tokio::test]
    async fn test_default_category_delete_rejected() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;
        let toys = tracker.inventory().category_by_name("玩具").unwrap().id;

        let result = tracker.delete_category(toys).await;
        assert!(matches!(result.unwrap_err(), Error::Protected { .. }));
        assert!(tracker.inventory().category(toys).is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_item_persist() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;
        let stationery = tracker.inventory().category_by_name("文具").unwrap().id;

        tracker
            .update_item(
                "003",
                ItemDetails {
                    name: "大拼图".to_string(),
                    category_id: stationery,
                    unit: "盒".to_string(),
                    description: String::new(),
                },
            )
            .await?;
        tracker.delete_item("004").await?;

        let tracker = reopen(tracker).await?;
        assert_eq!(tracker.inventory().item("003").unwrap().name, "大拼图");
        assert!(tracker.inventory().item("004").is_none());
        assert_eq!(tracker.inventory().items().len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_views() -> Result<()> {
        let mut tracker = open_sample_tracker().await?;
        tracker.inbound("003", 2, "采购", "").await?;

        assert_eq!(tracker.filter_inventory("玩具", None).len(), 2);
        assert_eq!(
            tracker.filter_records(Some(MovementType::Inbound), None).len(),
            1
        );

        let summary = tracker.summary();
        assert_eq!(summary.item_count, 4);
        assert_eq!(summary.total_quantity, 53);
        assert_eq!(summary.low_stock, 1);

        let stats = tracker.category_stats();
        let toys = stats.iter().find(|s| s.name == "玩具").unwrap();
        assert_eq!(toys.total_quantity, 15);

        Ok(())
    }
}
