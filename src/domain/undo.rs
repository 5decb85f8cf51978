use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::band::PayPeriodBand;
use crate::domain::base::Base;
use crate::domain::block::Block;
use crate::domain::fixed_bill::FixedBill;
use crate::domain::schedule::Schedule;

/// Full-value snapshot captured before a destructive delete, one variant per
/// deletable entity kind so restore logic can be matched exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndoableEntity {
    Block(Block),
    Base(Base),
    /// Deleting a band clears `band_id` on the blocks it held, so those
    /// blocks are snapshot alongside it.
    Band {
        band: PayPeriodBand,
        blocks: Vec<Block>,
    },
    Template(Block),
    Schedule(Schedule),
    FixedBill(FixedBill),
    /// Owner deletes reassign dependent rows to another value; the old
    /// per-row values are kept so the rewrite is reversible.
    Owner {
        name: String,
        reassigned_to: String,
        rows: Vec<OwnerReassignment>,
    },
    Category {
        name: String,
        reassigned_to: Option<String>,
        rows: Vec<CategoryReassignment>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerReassignment {
    pub block_id: Uuid,
    pub row_id: Uuid,
    pub previous: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryReassignment {
    pub block_id: Uuid,
    pub row_id: Uuid,
    pub previous: Option<String>,
}

/// One entry in the bounded undo history. Single-use: consumed by a
/// successful `undo_delete`, gone either way once looked up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UndoHistoryItem {
    pub id: Uuid,
    pub entity: UndoableEntity,
    pub timestamp: DateTime<Utc>,
    pub label: String,
}

impl UndoHistoryItem {
    pub fn new(label: impl Into<String>, entity: UndoableEntity) -> Self {
        Self {
            id: Uuid::new_v4(),
            entity,
            timestamp: Utc::now(),
            label: label.into(),
        }
    }
}
