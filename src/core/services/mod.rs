//! Mutator API consumed by UI collaborators.
//!
//! Stateless services over a caller-held `&mut Cashbook`. Validation runs
//! before any mutation; a rejected call leaves state untouched. Operating
//! on an id that no longer exists is a silent no-op, since the caller's
//! view may be stale.

pub mod band_service;
pub mod base_service;
pub mod block_service;
pub mod data_service;
pub mod fixed_bill_service;
pub mod library_service;
pub mod list_service;
pub mod schedule_service;
pub mod undo_service;

pub use band_service::BandService;
pub use base_service::BaseService;
pub use block_service::BlockService;
pub use data_service::DataService;
pub use fixed_bill_service::FixedBillService;
pub use library_service::LibraryService;
pub use list_service::ListService;
pub use schedule_service::ScheduleService;
pub use undo_service::UndoService;

use uuid::Uuid;

use crate::domain::common::{Identifiable, NamedEntity};
use crate::errors::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Invalid(String),
}

pub(crate) fn ensure_non_blank(value: &str, what: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::Invalid(format!("{what} must not be empty")))
    } else {
        Ok(())
    }
}

pub(crate) fn ensure_non_negative(
    amount: rust_decimal::Decimal,
    what: &str,
) -> ServiceResult<()> {
    if amount.is_sign_negative() {
        Err(ServiceError::Invalid(format!("{what} must not be negative")))
    } else {
        Ok(())
    }
}

/// Case-insensitive duplicate-name check shared by the entity services.
pub(crate) fn duplicate_name<'a, T, I>(items: I, exclude: Option<Uuid>, candidate: &str) -> bool
where
    T: Identifiable + NamedEntity + 'a,
    I: Iterator<Item = &'a T>,
{
    let normalized = candidate.trim().to_ascii_lowercase();
    items.into_iter().any(|item| {
        let name = item.name().trim().to_ascii_lowercase();
        name == normalized && exclude.map_or(true, |id| item.id() != id)
    })
}
