//! Startup seeding - turns whatever is in storage into a usable inventory.
//!
//! Missing categories are seeded from the configured defaults, missing items from the
//! configured samples, and a missing ledger starts empty. The fallback "Other" category
//! is re-created if it has gone missing, and items whose category no longer resolves are
//! moved into it.

use crate::{
    config::seed::{CategoryConfig, Config, SampleItemConfig},
    core::{
        category::insert_category,
        inventory::Inventory,
        persistence::{Collection, StoredCollections},
    },
    errors::{Error, Result},
    models::{FALLBACK_CATEGORY_NAME, NewItem},
};
use tracing::{info, warn};

/// A loaded or freshly seeded inventory, and the collections that must be written back.
#[derive(Debug)]
pub struct SeedOutcome {
    /// The inventory to work with
    pub inventory: Inventory,
    /// Collections that were seeded or repaired and are not yet in storage
    pub dirty: Vec<Collection>,
}

/// Builds the startup inventory from stored collections and the seed configuration.
pub fn load_or_seed(stored: StoredCollections, config: &Config) -> Result<SeedOutcome> {
    let mut dirty = Vec::new();
    let categories_missing = stored.categories.is_none();
    let items_missing = stored.items.is_none();

    let mut inventory = Inventory::from_parts(
        stored.items.unwrap_or_default(),
        stored.categories.unwrap_or_default(),
        stored.movements.unwrap_or_else(|| {
            dirty.push(Collection::Movements);
            Vec::new()
        }),
    );

    if categories_missing {
        seed_categories(&mut inventory, &config.categories)?;
        dirty.push(Collection::Categories);
    } else if ensure_fallback_category(&mut inventory)? {
        warn!("Fallback category was missing from storage and has been re-created");
        dirty.push(Collection::Categories);
    }

    if items_missing {
        seed_sample_items(&mut inventory, &config.sample_items)?;
        dirty.push(Collection::Items);
    } else if reassign_orphaned_items(&mut inventory)? > 0 {
        dirty.push(Collection::Items);
    }

    Ok(SeedOutcome { inventory, dirty })
}

/// Adds the configured default categories, then the fallback category if it was not
/// among them. Duplicate names in the configuration are skipped.
pub fn seed_categories(inventory: &mut Inventory, categories: &[CategoryConfig]) -> Result<()> {
    for category in categories {
        match insert_category(
            inventory,
            &category.name,
            &category.icon,
            &category.description,
            true,
        ) {
            Ok(_) => {}
            Err(Error::DuplicateName { name }) => {
                warn!(name = %name, "Skipping duplicate default category in config");
            }
            Err(e) => return Err(e),
        }
    }
    ensure_fallback_category(inventory)?;
    info!(count = inventory.categories().len(), "Default categories seeded");
    Ok(())
}

/// Makes sure the fallback category exists and is protected. Returns true if anything
/// had to change.
pub fn ensure_fallback_category(inventory: &mut Inventory) -> Result<bool> {
    if let Some(fallback) = inventory
        .categories_mut()
        .iter_mut()
        .find(|category| category.is_fallback())
    {
        if fallback.is_default {
            return Ok(false);
        }
        fallback.is_default = true;
        return Ok(true);
    }

    insert_category(inventory, FALLBACK_CATEGORY_NAME, "📦", "", true)?;
    Ok(true)
}

/// Adds the sample items with their starting quantities. Starting stock is not a
/// movement, so the ledger is left alone.
pub fn seed_sample_items(inventory: &mut Inventory, samples: &[SampleItemConfig]) -> Result<()> {
    let fallback_id = fallback_id(inventory)?;

    for sample in samples {
        let category_id = inventory
            .category_by_name(&sample.category)
            .map_or(fallback_id, |category| category.id);

        let item = match inventory.add_item(NewItem {
            id: Some(sample.id.clone()),
            name: sample.name.clone(),
            category_id,
            unit: sample.unit.clone(),
            description: sample.description.clone(),
        }) {
            Ok(item) => item,
            Err(Error::DuplicateItemId { id }) => {
                warn!(item_id = %id, "Skipping sample item whose id is already taken");
                continue;
            }
            Err(e) => return Err(e),
        };
        inventory.item_mut(&item.id)?.quantity = sample.quantity;
    }

    info!(count = samples.len(), "Sample items seeded");
    Ok(())
}

/// Moves items whose category does not resolve into the fallback category.
fn reassign_orphaned_items(inventory: &mut Inventory) -> Result<usize> {
    let fallback_id = fallback_id(inventory)?;
    let known: Vec<i64> = inventory.categories().iter().map(|c| c.id).collect();

    let mut reassigned = 0;
    for item in inventory.items_mut() {
        if !known.contains(&item.category_id) {
            warn!(item_id = %item.id, category_id = item.category_id, "Item had an unknown category");
            item.category_id = fallback_id;
            reassigned += 1;
        }
    }
    Ok(reassigned)
}

fn fallback_id(inventory: &Inventory) -> Result<i64> {
    inventory
        .fallback_category()
        .map(|category| category.id)
        .ok_or_else(|| Error::Config {
            message: format!("Fallback category '{FALLBACK_CATEGORY_NAME}' is missing"),
        })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{config::seed::parse_config, test_utils::*};

    fn sample_config() -> Config {
        parse_config(
            r#"
            [[categories]]
            name = "玩具"
            icon = "🧸"

            [[categories]]
            name = "玩具"

            [[sample_items]]
            id = "001"
            name = "积木玩具"
            category = "玩具"
            unit = "套"
            quantity = 15

            [[sample_items]]
            id = "002"
            name = "橡皮泥"
            category = "手工"
            unit = "盒"
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_first_run_seeds_everything() {
        let outcome = load_or_seed(StoredCollections::default(), &sample_config()).unwrap();
        let inventory = &outcome.inventory;

        let names: Vec<&str> = inventory.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["玩具", FALLBACK_CATEGORY_NAME]);
        assert!(inventory.categories().iter().all(|c| c.is_default));

        assert_eq!(inventory.item("001").unwrap().quantity, 15);
        let clay = inventory.item("002").unwrap();
        assert_eq!(inventory.category_name_of(clay), FALLBACK_CATEGORY_NAME);
        assert!(inventory.movements().is_empty());

        for collection in Collection::ALL {
            assert!(outcome.dirty.contains(&collection));
        }
    }

    #[test]
    fn test_stored_collections_are_kept() {
        let existing = seeded_inventory();
        let stored = StoredCollections {
            items: Some(Vec::new()),
            categories: Some(existing.categories().to_vec()),
            movements: Some(Vec::new()),
        };

        let outcome = load_or_seed(stored, &sample_config()).unwrap();
        assert!(outcome.dirty.is_empty());
        assert!(outcome.inventory.items().is_empty());
        assert_eq!(outcome.inventory.categories(), existing.categories());
    }

    #[test]
    fn test_missing_fallback_is_recreated() {
        let mut existing = seeded_inventory();
        existing
            .categories_mut()
            .retain(|category| !category.is_fallback());

        let stored = StoredCollections {
            items: Some(Vec::new()),
            categories: Some(existing.categories().to_vec()),
            movements: Some(Vec::new()),
        };

        let outcome = load_or_seed(stored, &Config::default()).unwrap();
        let fallback = outcome.inventory.fallback_category().unwrap();
        assert!(fallback.is_default);
        assert_eq!(outcome.dirty, vec![Collection::Categories]);
    }

    #[test]
    fn test_sample_ids_named_by_the_ledger_are_skipped() {
        let mut existing = seeded_inventory();
        stocked_item(&mut existing, "旧积木", 3);
        let stored = StoredCollections {
            items: None,
            categories: Some(existing.categories().to_vec()),
            movements: Some(existing.movements().to_vec()),
        };

        let outcome = load_or_seed(stored, &sample_config()).unwrap();
        assert!(outcome.inventory.item("001").is_none());
        assert!(outcome.inventory.item("002").is_some());
        assert_eq!(outcome.dirty, vec![Collection::Items]);
    }

    #[test]
    fn test_orphaned_items_move_to_fallback() {
        let mut existing = seeded_inventory();
        let item = stocked_item(&mut existing, "积木玩具", 4);
        let mut items = existing.items().to_vec();
        items[0].category_id = 999;

        let stored = StoredCollections {
            items: Some(items),
            categories: Some(existing.categories().to_vec()),
            movements: Some(existing.movements().to_vec()),
        };

        let outcome = load_or_seed(stored, &Config::default()).unwrap();
        let repaired = outcome.inventory.item(&item.id).unwrap();
        assert_eq!(
            outcome.inventory.category_name_of(repaired),
            FALLBACK_CATEGORY_NAME
        );
        assert_eq!(outcome.dirty, vec![Collection::Items]);
    }
}
