use uuid::Uuid;

use crate::core::history;
use crate::core::services::{duplicate_name, ensure_non_blank, ServiceError, ServiceResult};
use crate::domain::base::Base;
use crate::domain::cashbook::Cashbook;
use crate::domain::undo::UndoableEntity;

pub struct BaseService;

impl BaseService {
    pub fn add(book: &mut Cashbook, base: Base) -> ServiceResult<Uuid> {
        ensure_non_blank(&base.name, "Base name")?;
        if duplicate_name(book.bases.values(), None, &base.name) {
            return Err(ServiceError::Invalid(format!(
                "Base `{}` already exists",
                base.name
            )));
        }
        Ok(book.insert_base(base))
    }

    /// Applies the mutator to a copy, validates it, then commits. The
    /// balance is never editable this way: whatever the mutator wrote is
    /// discarded in favor of the ledger-engine-owned value.
    pub fn edit<F>(book: &mut Cashbook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Base),
    {
        let Some(existing) = book.base(id) else {
            return Ok(());
        };
        let snapshot = existing.clone();
        let mut updated = snapshot.clone();
        mutator(&mut updated);
        ensure_non_blank(&updated.name, "Base name")?;
        if duplicate_name(book.bases.values(), Some(id), &updated.name) {
            return Err(ServiceError::Invalid(format!(
                "Base `{}` already exists",
                updated.name
            )));
        }
        updated.id = snapshot.id;
        updated.created_at = snapshot.created_at;
        updated.balance = snapshot.balance;
        updated.touch();
        book.bases.insert(id, updated);
        book.touch();
        Ok(())
    }

    /// Snapshots the base, then removes it. Rows elsewhere that reference
    /// the deleted base keep their ids as-is; there is no cascading
    /// reversal or null-out. Returns the history id, or `None` when the id
    /// was already gone.
    pub fn remove(book: &mut Cashbook, id: Uuid) -> ServiceResult<Option<Uuid>> {
        let Some(base) = book.remove_base(id) else {
            return Ok(None);
        };
        let label = format!("Deleted base \"{}\"", base.name);
        tracing::info!(%id, "deleting base");
        let history_id = history::push(book, label, UndoableEntity::Base(base));
        Ok(Some(history_id))
    }

    /// Bases sorted by name for stable presentation.
    pub fn list(book: &Cashbook) -> Vec<&Base> {
        let mut bases: Vec<&Base> = book.bases.values().collect();
        bases.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        bases
    }
}
