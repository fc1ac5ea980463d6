//! Unified error type for `StockBuddy`.
//!
//! Business rejections (missing ids, insufficient stock, name clashes, protected
//! categories) abort an operation before anything is mutated. The remaining variants
//! cover configuration, database and storage failures.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// No item with the given identifier exists
    #[error("Item '{id}' not found")]
    ItemNotFound {
        /// Identifier that was looked up
        id: String,
    },

    /// No category with the given identifier exists
    #[error("Category {id} not found")]
    CategoryNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// An outbound movement asked for more than is on hand
    #[error("Insufficient stock for '{item_name}': {available} available, {requested} requested")]
    InsufficientStock {
        /// Name of the item at the time of the request
        item_name: String,
        /// Quantity currently on hand
        available: u32,
        /// Quantity the caller tried to take out
        requested: u32,
    },

    /// Another category already uses this name
    #[error("A category named '{name}' already exists")]
    DuplicateName {
        /// The clashing name
        name: String,
    },

    /// An item with the supplied identifier already exists
    #[error("An item with id '{id}' already exists")]
    DuplicateItemId {
        /// The clashing identifier
        id: String,
    },

    /// Default categories cannot be deleted
    #[error("Category '{name}' is a default category and cannot be deleted")]
    Protected {
        /// Name of the protected category
        name: String,
    },

    /// Quantity is zero, too large, or would overflow the stored count
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending quantity
        quantity: u64,
    },

    /// A field failed validation (empty name, empty unit, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Stored collections could not be serialized, parsed, or have an unknown version
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage problem
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for recoverable business rejections that should be shown to the
    /// user as a transient notice rather than logged as failures.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::ItemNotFound { .. }
                | Self::CategoryNotFound { .. }
                | Self::InsufficientStock { .. }
                | Self::DuplicateName { .. }
                | Self::DuplicateItemId { .. }
                | Self::Protected { .. }
                | Self::InvalidQuantity { .. }
                | Self::Validation { .. }
        )
    }

    /// How many units are missing for an outbound request, if this is an
    /// `InsufficientStock` error.
    #[must_use]
    pub const fn deficit(&self) -> Option<u32> {
        match self {
            Self::InsufficientStock {
                available,
                requested,
                ..
            } => Some(requested.saturating_sub(*available)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
