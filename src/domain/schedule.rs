use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::domain::interval::TimeInterval;

/// A standing generator that stamps a library template into the book on an
/// interval. `next_run` advances one interval per stamped occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub id: Uuid,
    pub title: String,
    pub template_id: Uuid,
    pub interval: TimeInterval,
    pub next_run: NaiveDate,
    #[serde(default = "Schedule::active_default")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn new(
        title: impl Into<String>,
        template_id: Uuid,
        interval: TimeInterval,
        next_run: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            template_id,
            interval,
            next_run,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.active && self.next_run <= today
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn active_default() -> bool {
        true
    }
}

impl Identifiable for Schedule {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Schedule {
    fn name(&self) -> &str {
        &self.title
    }
}
