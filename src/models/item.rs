//! Item model - a trackable stock keeping unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stock item. `quantity` only changes through inbound and outbound movements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier, e.g. `"001"`
    pub id: String,
    /// Display name (e.g. "积木玩具")
    pub name: String,
    /// Identifier of the category this item belongs to
    pub category_id: i64,
    /// Unit label (e.g. "套", "盒")
    pub unit: String,
    /// Free-text description
    pub description: String,
    /// Units currently on hand
    pub quantity: u32,
    /// When the item was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating an item.
#[derive(Clone, Debug, Default)]
pub struct NewItem {
    /// Explicit identifier; generated when `None`
    pub id: Option<String>,
    /// Display name
    pub name: String,
    /// Category identifier
    pub category_id: i64,
    /// Unit label
    pub unit: String,
    /// Free-text description
    pub description: String,
}

/// Editable item fields. Quantity is deliberately absent.
#[derive(Clone, Debug, Default)]
pub struct ItemDetails {
    /// Display name
    pub name: String,
    /// Category identifier
    pub category_id: i64,
    /// Unit label
    pub unit: String,
    /// Free-text description
    pub description: String,
}
