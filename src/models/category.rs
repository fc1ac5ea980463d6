//! Category model - a named grouping for items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the category that receives the items of a deleted category.
pub const FALLBACK_CATEGORY_NAME: &str = "Other";

/// An item category. Default categories are seeded at first run and cannot be deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Unique display name (case-sensitive)
    pub name: String,
    /// Icon glyph shown next to the name
    pub icon: String,
    /// Free-text description
    pub description: String,
    /// Protected from deletion when true
    pub is_default: bool,
    /// When the category was created
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Whether this is the fallback category items are moved into on delete.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.name == FALLBACK_CATEGORY_NAME
    }
}
