//! Inventory store - the explicit owner of the three collections.
//!
//! Items keep insertion order, categories keep creation order, and the movement ledger
//! is kept newest first. All mutation goes through `&mut Inventory`; there is no ambient
//! global state.

use crate::{
    errors::{Error, Result},
    models::{Category, FALLBACK_CATEGORY_NAME, Item, ItemDetails, Movement, NewItem},
};
use chrono::Utc;
use tracing::{debug, info};

/// In-memory collections of items, categories and movements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
    categories: Vec<Category>,
    movements: Vec<Movement>,
}

impl Inventory {
    /// Builds a store from already loaded collections.
    #[must_use]
    pub const fn from_parts(
        items: Vec<Item>,
        categories: Vec<Category>,
        movements: Vec<Movement>,
    ) -> Self {
        Self {
            items,
            categories,
            movements,
        }
    }

    /// All items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All categories in creation order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The movement ledger, newest first.
    #[must_use]
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    /// Looks up an item by identifier.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Looks up a category by identifier.
    #[must_use]
    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Looks up a category by exact name.
    #[must_use]
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// The category that receives items when their category is deleted.
    #[must_use]
    pub fn fallback_category(&self) -> Option<&Category> {
        self.category_by_name(FALLBACK_CATEGORY_NAME)
    }

    /// Name of the item's category, or an empty string if it does not resolve.
    #[must_use]
    pub fn category_name_of(&self, item: &Item) -> &str {
        self.category(item.category_id)
            .map_or("", |category| category.name.as_str())
    }

    /// `(id, label)` pairs for item pickers, e.g. `("001", "积木玩具 (玩具)")`.
    #[must_use]
    pub fn item_options(&self) -> Vec<(String, String)> {
        self.items
            .iter()
            .map(|item| {
                (
                    item.id.clone(),
                    format!("{} ({})", item.name, self.category_name_of(item)),
                )
            })
            .collect()
    }

    /// Creates an item with quantity 0.
    ///
    /// When `new_item.id` is `None` the next zero-padded numeric identifier is used.
    /// Identifiers still named by the ledger are never handed out again.
    pub fn add_item(&mut self, new_item: NewItem) -> Result<Item> {
        let name = required_field(&new_item.name, "Item name")?;
        let unit = required_field(&new_item.unit, "Item unit")?;
        self.require_category(new_item.category_id)?;

        let id = match new_item.id {
            Some(id) => required_field(&id, "Item id")?,
            None => self.next_item_id()?,
        };
        if self.item(&id).is_some() || self.movements.iter().any(|m| m.item_id == id) {
            return Err(Error::DuplicateItemId { id });
        }

        let item = Item {
            id,
            name,
            category_id: new_item.category_id,
            unit,
            description: new_item.description.trim().to_string(),
            quantity: 0,
            created_at: Utc::now(),
        };

        info!(item_id = %item.id, name = %item.name, "Item added");
        self.items.push(item.clone());
        Ok(item)
    }

    /// Edits an item's descriptive fields. Quantity is untouched.
    pub fn update_item(&mut self, id: &str, details: ItemDetails) -> Result<Item> {
        let name = required_field(&details.name, "Item name")?;
        let unit = required_field(&details.unit, "Item unit")?;
        self.require_category(details.category_id)?;

        let item = self.item_mut(id)?;
        item.name = name;
        item.unit = unit;
        item.category_id = details.category_id;
        item.description = details.description.trim().to_string();

        debug!(item_id = %item.id, "Item details updated");
        Ok(item.clone())
    }

    /// Removes an item. Movements that reference it are kept.
    pub fn delete_item(&mut self, id: &str) -> Result<Item> {
        let position = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })?;

        let item = self.items.remove(position);
        info!(item_id = %item.id, name = %item.name, "Item deleted");
        Ok(item)
    }

    pub(crate) fn item_mut(&mut self, id: &str) -> Result<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| Error::ItemNotFound { id: id.to_string() })
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    pub(crate) fn categories_mut(&mut self) -> &mut Vec<Category> {
        &mut self.categories
    }

    pub(crate) fn require_category(&self, id: i64) -> Result<&Category> {
        self.category(id).ok_or(Error::CategoryNotFound { id })
    }

    /// Prepends a movement to the ledger.
    pub(crate) fn record_movement(&mut self, movement: Movement) {
        self.movements.insert(0, movement);
    }

    pub(crate) fn next_movement_id(&self) -> i64 {
        self.movements.iter().map(|m| m.id).max().unwrap_or(0) + 1
    }

    pub(crate) fn next_category_id(&self) -> i64 {
        self.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    /// One past the highest numeric id among current items and the ledger. The ledger
    /// is append-only, so deleted ids stay retired.
    fn next_item_id(&self) -> Result<String> {
        let highest = self
            .items
            .iter()
            .map(|item| item.id.as_str())
            .chain(self.movements.iter().map(|m| m.item_id.as_str()))
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next = highest.checked_add(1).ok_or_else(|| Error::Validation {
            message: "Numeric item ids are exhausted, supply an explicit id".to_string(),
        })?;
        Ok(format!("{next:03}"))
    }
}

/// Trims a required text field, rejecting empty input.
pub(crate) fn required_field(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}
