//! Domain models - the three collections the tracker persists.
//!
//! These are plain serde structs; their field names are the stored JSON field names.

pub mod category;
pub mod item;
pub mod movement;

pub use category::{Category, FALLBACK_CATEGORY_NAME};
pub use item::{Item, ItemDetails, NewItem};
pub use movement::{Movement, MovementKind, MovementType};
