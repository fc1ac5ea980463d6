//! View projections - filtered lists and statistics for presentation.
//!
//! Everything here is a pure function of the collections it is given. Nothing is cached;
//! callers recompute on every render.

use crate::models::{Category, Item, Movement, MovementType};
use chrono::{Local, NaiveDate, TimeZone};

/// Quantities at or below this value (and above zero) count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Stock level classification for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    /// Nothing on hand
    OutOfStock,
    /// Between 1 and `LOW_STOCK_THRESHOLD` units
    Low,
    /// More than `LOW_STOCK_THRESHOLD` units
    Sufficient,
}

impl StockStatus {
    /// Label shown next to the quantity.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "缺货",
            Self::Low => "库存不足",
            Self::Sufficient => "库存充足",
        }
    }
}

/// Classifies a quantity.
#[must_use]
pub const fn stock_status(quantity: u32) -> StockStatus {
    match quantity {
        0 => StockStatus::OutOfStock,
        q if q <= LOW_STOCK_THRESHOLD => StockStatus::Low,
        _ => StockStatus::Sufficient,
    }
}

/// Items whose name contains `search_term` (case-insensitive) or whose id contains it,
/// restricted to `category_filter` when one is given. Insertion order is kept.
#[must_use]
pub fn filter_inventory<'a>(
    items: &'a [Item],
    search_term: &str,
    category_filter: Option<i64>,
) -> Vec<&'a Item> {
    let needle = search_term.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle) || item.id.contains(search_term))
        .filter(|item| category_filter.is_none_or(|category_id| item.category_id == category_id))
        .collect()
}

/// Movements of the given type recorded on the given local calendar day.
/// Either filter may be omitted. The ledger's newest-first order is kept.
#[must_use]
pub fn filter_records(
    records: &[Movement],
    type_filter: Option<MovementType>,
    date_filter: Option<NaiveDate>,
) -> Vec<&Movement> {
    filter_records_in(records, type_filter, date_filter, &Local)
}

/// Same as [`filter_records`], comparing calendar days in `tz`.
#[must_use]
pub fn filter_records_in<'a, Tz: TimeZone>(
    records: &'a [Movement],
    type_filter: Option<MovementType>,
    date_filter: Option<NaiveDate>,
    tz: &Tz,
) -> Vec<&'a Movement> {
    records
        .iter()
        .filter(|record| type_filter.is_none_or(|kind| record.movement_type() == kind))
        .filter(|record| {
            date_filter.is_none_or(|date| record.timestamp.with_timezone(tz).date_naive() == date)
        })
        .collect()
}

/// Item count and total quantity of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    /// Category identifier
    pub category_id: i64,
    /// Category name
    pub name: String,
    /// Category icon
    pub icon: String,
    /// Number of items in the category
    pub item_count: usize,
    /// Sum of the quantities of those items
    pub total_quantity: u64,
}

/// Per-category statistics, in category order.
#[must_use]
pub fn category_stats(items: &[Item], categories: &[Category]) -> Vec<CategoryStats> {
    categories
        .iter()
        .map(|category| {
            let members = items.iter().filter(|item| item.category_id == category.id);
            let (item_count, total_quantity) = members.fold((0, 0), |(count, total), item| {
                (count + 1, total + u64::from(item.quantity))
            });
            CategoryStats {
                category_id: category.id,
                name: category.name.clone(),
                icon: category.icon.clone(),
                item_count,
                total_quantity,
            }
        })
        .collect()
}

/// Headline numbers for the whole inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventorySummary {
    /// Number of distinct items
    pub item_count: usize,
    /// Total units on hand
    pub total_quantity: u64,
    /// Items with nothing on hand
    pub out_of_stock: usize,
    /// Items that are low but not empty
    pub low_stock: usize,
}

/// Computes the headline numbers for a set of items.
#[must_use]
pub fn inventory_summary(items: &[Item]) -> InventorySummary {
    items
        .iter()
        .fold(InventorySummary::default(), |mut summary, item| {
            summary.item_count += 1;
            summary.total_quantity += u64::from(item.quantity);
            match stock_status(item.quantity) {
                StockStatus::OutOfStock => summary.out_of_stock += 1,
                StockStatus::Low => summary.low_stock += 1,
                StockStatus::Sufficient => {}
            }
            summary
        })
}
