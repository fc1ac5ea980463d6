//! Persistence adapter - loads and saves the three collections.
//!
//! Each collection is serialized as a whole to JSON, wrapped with a schema version, and
//! stored under a fixed key in the `storage_entries` table. Saves always overwrite the
//! full collection; there is no incremental diff.

use crate::{
    core::inventory::Inventory,
    entities::{StorageEntry, storage_entry},
    errors::{Error, Result},
    models::{Category, Item, Movement},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

/// Version written into every stored collection.
pub const SCHEMA_VERSION: u32 = 1;

/// The three persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Stock items
    Items,
    /// Item categories
    Categories,
    /// The movement ledger
    Movements,
}

impl Collection {
    /// Every collection, in save order.
    pub const ALL: [Self; 3] = [Self::Items, Self::Categories, Self::Movements];

    /// Fixed storage key of the collection.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Items => "kindergarten_inventory",
            Self::Categories => "kindergarten_categories",
            Self::Movements => "kindergarten_records",
        }
    }
}

#[derive(Serialize)]
struct VersionedRef<'a, T> {
    version: u32,
    entries: &'a [T],
}

#[derive(Deserialize)]
struct Versioned<T> {
    version: u32,
    entries: Vec<T>,
}

/// Serializes a collection with the current schema version.
pub fn encode_collection<T: Serialize>(entries: &[T]) -> Result<String> {
    serde_json::to_string(&VersionedRef {
        version: SCHEMA_VERSION,
        entries,
    })
    .map_err(Into::into)
}

/// Parses a stored collection, rejecting unknown schema versions.
pub fn decode_collection<T: DeserializeOwned>(key: &str, value: &str) -> Result<Vec<T>> {
    let stored: Versioned<T> = serde_json::from_str(value).map_err(|e| Error::Storage {
        message: format!("Failed to parse '{key}': {e}"),
    })?;

    if stored.version != SCHEMA_VERSION {
        return Err(Error::Storage {
            message: format!(
                "'{key}' has schema version {}, expected {SCHEMA_VERSION}",
                stored.version
            ),
        });
    }
    Ok(stored.entries)
}

/// Reads the raw value stored under `key`.
pub async fn read_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let entry = StorageEntry::find()
        .filter(storage_entry::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(entry.map(|entry| entry.value))
}

/// Writes `value` under `key`, replacing any previous value.
pub async fn write_value<C>(db: &C, key: &str, value: String) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let existing = StorageEntry::find()
        .filter(storage_entry::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(entry) = existing {
        let mut active_model: storage_entry::ActiveModel = entry.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_entry = storage_entry::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_entry.insert(db).await?;
    }

    Ok(())
}

/// Loads one collection. `Ok(None)` means nothing has been stored under its key yet.
pub async fn load_collection<T, C>(db: &C, collection: Collection) -> Result<Option<Vec<T>>>
where
    T: DeserializeOwned,
    C: ConnectionTrait,
{
    let key = collection.key();
    match read_value(db, key).await? {
        Some(value) => {
            let entries = decode_collection(key, &value)?;
            debug!(key, count = entries.len(), "Loaded collection");
            Ok(Some(entries))
        }
        None => Ok(None),
    }
}

/// Overwrites one collection.
pub async fn save_collection<T, C>(db: &C, collection: Collection, entries: &[T]) -> Result<()>
where
    T: Serialize,
    C: ConnectionTrait,
{
    let key = collection.key();
    write_value(db, key, encode_collection(entries)?).await?;
    debug!(key, count = entries.len(), "Saved collection");
    Ok(())
}

/// Whatever was found in storage at startup. Missing collections are `None`.
#[derive(Debug, Default)]
pub struct StoredCollections {
    /// Stored items
    pub items: Option<Vec<Item>>,
    /// Stored categories
    pub categories: Option<Vec<Category>>,
    /// Stored movements
    pub movements: Option<Vec<Movement>>,
}

/// Loads all three collections.
pub async fn load_all<C>(db: &C) -> Result<StoredCollections>
where
    C: ConnectionTrait,
{
    Ok(StoredCollections {
        items: load_collection(db, Collection::Items).await?,
        categories: load_collection(db, Collection::Categories).await?,
        movements: load_collection(db, Collection::Movements).await?,
    })
}

/// Writes the given collections of `inventory` through to storage.
pub async fn save_collections<C>(
    db: &C,
    inventory: &Inventory,
    collections: &[Collection],
) -> Result<()>
where
    C: ConnectionTrait,
{
    for collection in collections {
        match collection {
            Collection::Items => save_collection(db, *collection, inventory.items()).await?,
            Collection::Categories => {
                save_collection(db, *collection, inventory.categories()).await?;
            }
            Collection::Movements => {
                save_collection(db, *collection, inventory.movements()).await?;
            }
        }
    }
    Ok(())
}
