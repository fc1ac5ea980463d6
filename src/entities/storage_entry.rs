//! Storage entry entity - the key-value table the collections are persisted in.
//!
//! Each row holds one whole collection serialized as JSON under a fixed key, mirroring
//! a browser's local storage: every save overwrites the full value.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storage entry database model - one serialized collection per key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g. `"kindergarten_inventory"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Serialized collection
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this entry was last written
    pub updated_at: DateTime,
}

/// `StorageEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
