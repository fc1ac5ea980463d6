//! Category business logic - create, rename and delete categories.
//!
//! Items reference their category by id, so a rename is a single in-place update.
//! Deleting a category moves its items into the fallback "Other" category.

use crate::{
    core::inventory::{Inventory, required_field},
    errors::{Error, Result},
    models::Category,
};
use chrono::Utc;
use tracing::{info, warn};

/// Outcome of a category deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDeletion {
    /// The removed category
    pub category: Category,
    /// Number of items moved into the fallback category
    pub reassigned_items: usize,
}

/// Creates a new, non-default category.
///
/// # Errors
/// - `Validation` if the trimmed name is empty
/// - `DuplicateName` if a category with exactly this name exists
pub fn add_category(
    inventory: &mut Inventory,
    name: &str,
    icon: &str,
    description: &str,
) -> Result<Category> {
    insert_category(inventory, name, icon, description, false)
}

/// Inserts a category, used both for user-created and seeded categories.
pub(crate) fn insert_category(
    inventory: &mut Inventory,
    name: &str,
    icon: &str,
    description: &str,
    is_default: bool,
) -> Result<Category> {
    let name = required_field(name, "Category name")?;
    if inventory.category_by_name(&name).is_some() {
        return Err(Error::DuplicateName { name });
    }

    let category = Category {
        id: inventory.next_category_id(),
        name,
        icon: icon.trim().to_string(),
        description: description.trim().to_string(),
        is_default,
        created_at: Utc::now(),
    };

    info!(category_id = category.id, name = %category.name, is_default, "Category added");
    inventory.categories_mut().push(category.clone());
    Ok(category)
}

/// Renames a category and replaces its icon and description.
///
/// Keeping the current name is allowed. The fallback category cannot be renamed away
/// from its fixed name.
///
/// # Errors
/// - `CategoryNotFound` if no category has `id`
/// - `Validation` if the trimmed name is empty, or the fallback category would be renamed
/// - `DuplicateName` if another category already holds the new name
pub fn edit_category(
    inventory: &mut Inventory,
    id: i64,
    name: &str,
    icon: &str,
    description: &str,
) -> Result<Category> {
    let name = required_field(name, "Category name")?;
    let current = inventory.require_category(id)?;

    if current.is_fallback() && current.name != name {
        return Err(Error::Validation {
            message: format!("Category '{}' cannot be renamed", current.name),
        });
    }

    if inventory
        .categories()
        .iter()
        .any(|other| other.id != id && other.name == name)
    {
        return Err(Error::DuplicateName { name });
    }

    let category = inventory
        .categories_mut()
        .iter_mut()
        .find(|category| category.id == id)
        .ok_or(Error::CategoryNotFound { id })?;

    if category.name != name {
        info!(category_id = id, from = %category.name, to = %name, "Category renamed");
    }
    category.name = name;
    category.icon = icon.trim().to_string();
    category.description = description.trim().to_string();
    Ok(category.clone())
}

/// Number of items currently in a category, shown in the delete confirmation.
#[must_use]
pub fn dependent_item_count(inventory: &Inventory, id: i64) -> usize {
    inventory
        .items()
        .iter()
        .filter(|item| item.category_id == id)
        .count()
}

/// Deletes a non-default category and moves its items to the fallback category.
///
/// # Errors
/// - `CategoryNotFound` if no category has `id`, or the fallback category is missing
/// - `Protected` if the category is a default category
pub fn delete_category(inventory: &mut Inventory, id: i64) -> Result<CategoryDeletion> {
    let category = inventory.require_category(id)?;
    if category.is_default || category.is_fallback() {
        warn!(category_id = id, name = %category.name, "Refusing to delete default category");
        return Err(Error::Protected {
            name: category.name.clone(),
        });
    }

    // The fallback is a default category, so it can never be the one being deleted.
    let fallback_id = inventory
        .fallback_category()
        .map(|fallback| fallback.id)
        .ok_or(Error::CategoryNotFound { id })?;

    let mut reassigned_items = 0;
    for item in inventory.items_mut() {
        if item.category_id == id {
            item.category_id = fallback_id;
            reassigned_items += 1;
        }
    }

    let categories = inventory.categories_mut();
    let position = categories
        .iter()
        .position(|category| category.id == id)
        .ok_or(Error::CategoryNotFound { id })?;
    let category = categories.remove(position);

    info!(
        category_id = id,
        name = %category.name,
        reassigned_items,
        "Category deleted"
    );
    Ok(CategoryDeletion {
        category,
        reassigned_items,
    })
}
