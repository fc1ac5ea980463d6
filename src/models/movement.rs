//! Movement model - an immutable record of a quantity change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction-specific fields of a movement.
///
/// Serialized inline with a `"type"` tag so a stored record reads
/// `{"type": "outbound", "className": ..., "teacher": ..., ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MovementKind {
    /// Stock received
    #[serde(rename_all = "camelCase")]
    Inbound {
        /// Why the stock came in (purchase, donation, ...)
        reason: String,
    },
    /// Stock handed out
    #[serde(rename_all = "camelCase")]
    Outbound {
        /// Class that received the stock
        class_name: String,
        /// Teacher who collected it
        teacher: String,
    },
}

/// Movement direction without its payload, used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementType {
    /// 入库
    Inbound,
    /// 出库
    Outbound,
}

impl MovementType {
    /// Label shown in the records list.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inbound => "入库",
            Self::Outbound => "出库",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A ledger entry. Created once by a stock operation and never edited afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// Unique identifier
    pub id: i64,
    /// Direction and direction-specific fields
    #[serde(flatten)]
    pub kind: MovementKind,
    /// Item the movement applies to
    pub item_id: String,
    /// Item name captured when the movement was recorded
    pub item_name: String,
    /// Item unit captured when the movement was recorded
    pub unit: String,
    /// Units moved, always positive
    pub quantity: u32,
    /// Free-text note
    pub note: String,
    /// When the movement was recorded
    pub timestamp: DateTime<Utc>,
    /// Who recorded it
    pub operator: String,
}

impl Movement {
    /// The direction of this movement.
    #[must_use]
    pub const fn movement_type(&self) -> MovementType {
        match self.kind {
            MovementKind::Inbound { .. } => MovementType::Inbound,
            MovementKind::Outbound { .. } => MovementType::Outbound,
        }
    }
}
