//! Stock operations - inbound and outbound movements.
//!
//! Each successful operation changes exactly one item's quantity and prepends exactly
//! one movement to the ledger. Every check runs before the item is touched, so a
//! rejected operation leaves the inventory unchanged.

use crate::{
    core::inventory::Inventory,
    errors::{Error, Result},
    models::{Movement, MovementKind},
};
use chrono::Utc;
use tracing::{info, warn};

/// Reason recorded for quick inbound movements.
pub const QUICK_INBOUND_REASON: &str = "快速入库";

/// Class label recorded for quick outbound movements.
pub const QUICK_OUTBOUND_CLASS: &str = "快速出库";

/// Receives `quantity` units of an item.
///
/// # Errors
/// - `InvalidQuantity` if `quantity` is zero or the new total would overflow
/// - `ItemNotFound` if no item has `item_id`
pub fn inbound(
    inventory: &mut Inventory,
    operator: &str,
    item_id: &str,
    quantity: u32,
    reason: &str,
    note: &str,
) -> Result<Movement> {
    if quantity == 0 {
        return Err(Error::InvalidQuantity { quantity: 0 });
    }

    let movement_id = inventory.next_movement_id();
    let item = inventory.item_mut(item_id)?;
    let new_quantity = item
        .quantity
        .checked_add(quantity)
        .ok_or(Error::InvalidQuantity {
            quantity: u64::from(item.quantity) + u64::from(quantity),
        })?;
    item.quantity = new_quantity;

    let movement = Movement {
        id: movement_id,
        kind: MovementKind::Inbound {
            reason: reason.trim().to_string(),
        },
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        unit: item.unit.clone(),
        quantity,
        note: note.trim().to_string(),
        timestamp: Utc::now(),
        operator: operator.to_string(),
    };

    info!(
        item_id = %movement.item_id,
        quantity,
        on_hand = new_quantity,
        "Inbound recorded"
    );
    inventory.record_movement(movement.clone());
    Ok(movement)
}

/// Hands out `quantity` units of an item to a class.
///
/// # Errors
/// - `InvalidQuantity` if `quantity` is zero
/// - `ItemNotFound` if no item has `item_id`
/// - `InsufficientStock` if fewer than `quantity` units are on hand
pub fn outbound(
    inventory: &mut Inventory,
    operator: &str,
    item_id: &str,
    quantity: u32,
    class_name: &str,
    teacher: &str,
    note: &str,
) -> Result<Movement> {
    if quantity == 0 {
        return Err(Error::InvalidQuantity { quantity: 0 });
    }

    let movement_id = inventory.next_movement_id();
    let item = inventory.item_mut(item_id)?;
    if quantity > item.quantity {
        warn!(
            item_id = %item.id,
            available = item.quantity,
            requested = quantity,
            "Outbound rejected: insufficient stock"
        );
        return Err(Error::InsufficientStock {
            item_name: item.name.clone(),
            available: item.quantity,
            requested: quantity,
        });
    }
    item.quantity -= quantity;

    let movement = Movement {
        id: movement_id,
        kind: MovementKind::Outbound {
            class_name: class_name.trim().to_string(),
            teacher: teacher.trim().to_string(),
        },
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        unit: item.unit.clone(),
        quantity,
        note: note.trim().to_string(),
        timestamp: Utc::now(),
        operator: operator.to_string(),
    };

    info!(
        item_id = %movement.item_id,
        quantity,
        on_hand = item.quantity,
        "Outbound recorded"
    );
    inventory.record_movement(movement.clone());
    Ok(movement)
}

/// Parses the free-text quantity typed into a quick inbound/outbound prompt.
///
/// Returns `Ok(None)` for non-numeric, zero or negative input (the prompt is simply
/// ignored), and `InvalidQuantity` for values above `max_quantity`.
pub fn parse_quick_quantity(input: &str, max_quantity: u32) -> Result<Option<u32>> {
    let Ok(value) = input.trim().parse::<i64>() else {
        return Ok(None);
    };
    if value <= 0 {
        return Ok(None);
    }

    let value = value.unsigned_abs();
    if value > u64::from(max_quantity) {
        return Err(Error::InvalidQuantity { quantity: value });
    }
    u32::try_from(value)
        .map(Some)
        .map_err(|_| Error::InvalidQuantity { quantity: value })
}

/// Quick inbound from a single prompt. `Ok(None)` means the input was ignored.
pub fn quick_inbound(
    inventory: &mut Inventory,
    operator: &str,
    item_id: &str,
    input: &str,
    max_quantity: u32,
) -> Result<Option<Movement>> {
    inventory
        .item(item_id)
        .ok_or_else(|| Error::ItemNotFound {
            id: item_id.to_string(),
        })?;

    let Some(quantity) = parse_quick_quantity(input, max_quantity)? else {
        return Ok(None);
    };
    inbound(
        inventory,
        operator,
        item_id,
        quantity,
        QUICK_INBOUND_REASON,
        "",
    )
    .map(Some)
}

/// Quick outbound from a single prompt, handed out by the operator.
/// `Ok(None)` means the input was ignored.
pub fn quick_outbound(
    inventory: &mut Inventory,
    operator: &str,
    item_id: &str,
    input: &str,
    max_quantity: u32,
) -> Result<Option<Movement>> {
    inventory
        .item(item_id)
        .ok_or_else(|| Error::ItemNotFound {
            id: item_id.to_string(),
        })?;

    let Some(quantity) = parse_quick_quantity(input, max_quantity)? else {
        return Ok(None);
    };
    outbound(
        inventory,
        operator,
        item_id,
        quantity,
        QUICK_OUTBOUND_CLASS,
        operator,
        "",
    )
    .map(Some)
}
