use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::domain::interval::days_in_month;

/// A standing monthly obligation used to prefill Fixed Bill blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixedBill {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    /// Day of month the bill falls due, clamped to the month length.
    pub due_day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_base: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub autopay: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FixedBill {
    pub fn new(name: impl Into<String>, amount: Decimal, due_day: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            due_day,
            from_base: None,
            category: None,
            autopay: false,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_from(mut self, base_id: Uuid) -> Self {
        self.from_base = Some(base_id);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Concrete due date within the given month, `due_day` clamped to the
    /// month's length (a day-31 bill falls on Feb 28/29).
    pub fn due_date_in(&self, year: i32, month: u32) -> NaiveDate {
        let day = self.due_day.clamp(1, days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for FixedBill {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for FixedBill {
    fn name(&self) -> &str {
        &self.name
    }
}
