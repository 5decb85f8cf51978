use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};

/// A tracked account-like balance holder.
///
/// The balance is mutated only by the ledger engine when rows execute or
/// revert; form-level edits never write it directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Base {
    pub id: Uuid,
    pub name: String,
    pub kind: BaseKind,
    pub balance: Decimal,
    pub currency: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Base {
    pub fn new(name: impl Into<String>, kind: BaseKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            balance: Decimal::ZERO,
            currency: "USD".into(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Base {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Base {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Enumerates the supported base classifications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BaseKind {
    Checking,
    Savings,
    Credit,
    Loan,
    Vault,
    Goal,
    Custom(String),
}
