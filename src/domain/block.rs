use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Identifiable;
use crate::domain::interval::TimeInterval;

/// Declares how a block's rows move money between bases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlockKind {
    Income,
    FixedBill,
    Flow,
}

/// A titled group of rows sharing one declared kind, filed into a band by
/// date. `band_id` is derived: it is recomputed from `date` whenever the
/// block is created or its date changes, never chosen ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Block {
    pub id: Uuid,
    pub kind: BlockKind,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_id: Option<Uuid>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Block {
    pub fn new(kind: BlockKind, title: impl Into<String>, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            date,
            rows: Vec::new(),
            band_id: None,
            is_template: false,
            recurrence: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    pub fn row(&self, id: Uuid) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn row_mut(&mut self, id: Uuid) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    /// Row ids currently marked executed, in row order.
    pub fn executed_row_ids(&self) -> Vec<Uuid> {
        self.rows
            .iter()
            .filter(|row| row.executed)
            .map(|row| row.id)
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Block {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// One planned or actual money movement inside a block.
///
/// The balance effect of a row depends jointly on the owning block's kind
/// and on which of `from_base`/`to_base` are present; an absent side simply
/// skips that leg. While `executed` is true the row's amount is what a
/// later reversal will read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Row {
    pub id: Uuid,
    pub date: NaiveDate,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_base: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_base: Option<Uuid>,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_mode: Option<FlowMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub executed: bool,
}

impl Row {
    pub fn new(date: NaiveDate, owner: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            owner: owner.into(),
            source: None,
            from_base: None,
            to_base: None,
            amount,
            flow_mode: None,
            flow_value: None,
            category: None,
            notes: None,
            executed: false,
        }
    }

    pub fn with_from(mut self, base_id: Uuid) -> Self {
        self.from_base = Some(base_id);
        self
    }

    pub fn with_to(mut self, base_id: Uuid) -> Self {
        self.to_base = Some(base_id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// How a flow row's amount was derived in the editing surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlowMode {
    Fixed,
    Percent,
}

/// Repetition rule attached to a block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recurrence {
    pub start_date: NaiveDate,
    pub interval: TimeInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl Recurrence {
    /// Next occurrence strictly after `from`, or `None` once past the end.
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        let candidate = self.interval.next_date(from);
        match self.end {
            Some(end) if candidate > end => None,
            _ => Some(candidate),
        }
    }
}
