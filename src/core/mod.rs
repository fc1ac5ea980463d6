//! Core business logic - framework-agnostic inventory, stock, category and view
//! operations, plus the persistence adapter and startup seeding.

/// Category create, rename and delete
pub mod category;
/// The in-memory inventory store
pub mod inventory;
/// Loading and saving the persisted collections
pub mod persistence;
/// Load-or-seed at startup
pub mod seed;
/// Inbound and outbound movements
pub mod stock;
/// Filtered views and statistics
pub mod view;
