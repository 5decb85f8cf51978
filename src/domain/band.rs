use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};

/// Decides which boundary date names the month a band belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MonthAttribution {
    #[default]
    StartMonth,
    EndMonth,
}

/// A named calendar interval used to file blocks by date. Assignment treats
/// `[start_date, end_date]` as inclusive; callers keep bands free of overlap
/// so first-match stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayPeriodBand {
    pub id: Uuid,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub order: u32,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub attribution: MonthAttribution,
    /// Derived from `(start_date|end_date, attribution)`. Recomputed by the
    /// mutators that change those inputs, not on read, so snapshots persist
    /// a point-in-time value.
    pub display_month: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayPeriodBand {
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        order: u32,
    ) -> Self {
        let now = Utc::now();
        let attribution = MonthAttribution::default();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_date,
            end_date,
            order,
            archived: false,
            attribution,
            display_month: display_month_for(start_date, end_date, attribution),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Re-derives `display_month` from the current dates and rule.
    pub fn refresh_display_month(&mut self) {
        self.display_month = display_month_for(self.start_date, self.end_date, self.attribution);
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for PayPeriodBand {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for PayPeriodBand {
    fn name(&self) -> &str {
        &self.title
    }
}

/// `"YYYY-MM"` of whichever boundary the attribution rule selects.
pub fn display_month_for(
    start_date: NaiveDate,
    end_date: NaiveDate,
    attribution: MonthAttribution,
) -> String {
    let date = match attribution {
        MonthAttribution::StartMonth => start_date,
        MonthAttribution::EndMonth => end_date,
    };
    format!("{:04}-{:02}", date.year(), date.month())
}
