use uuid::Uuid;

use crate::core::history;
use crate::core::services::{ensure_non_blank, ServiceResult};
use crate::domain::cashbook::{Cashbook, MasterList};
use crate::domain::undo::{CategoryReassignment, OwnerReassignment, UndoableEntity};

/// Master-list maintenance. Owner and category deletes rewrite dependent
/// rows to a replacement value and snapshot the old per-row values so the
/// rewrite is reversible.
pub struct ListService;

impl ListService {
    /// No-op when the value is already present (case-sensitive).
    pub fn add(book: &mut Cashbook, list: MasterList, value: &str) -> ServiceResult<()> {
        ensure_non_blank(value, "List value")?;
        book.add_to_master_list(list, value);
        Ok(())
    }

    /// Removes an owner, reassigning every dependent row to `reassign_to`.
    /// The replacement joins the owners list if it is not already there.
    /// Returns the history id, or `None` when the owner was not listed.
    pub fn remove_owner(
        book: &mut Cashbook,
        name: &str,
        reassign_to: &str,
    ) -> ServiceResult<Option<Uuid>> {
        ensure_non_blank(reassign_to, "Replacement owner")?;
        let Some(position) = book.owners.iter().position(|entry| entry == name) else {
            return Ok(None);
        };

        let mut rows = Vec::new();
        for block in book.blocks.values_mut() {
            for row in block.rows.iter_mut() {
                if row.owner == name {
                    rows.push(OwnerReassignment {
                        block_id: block.id,
                        row_id: row.id,
                        previous: std::mem::replace(&mut row.owner, reassign_to.to_string()),
                    });
                }
            }
        }
        book.owners.remove(position);
        book.add_to_master_list(MasterList::Owners, reassign_to);
        book.touch();
        tracing::info!(owner = name, rows = rows.len(), "deleting owner");
        let history_id = history::push(
            book,
            format!("Deleted owner \"{name}\""),
            UndoableEntity::Owner {
                name: name.to_string(),
                reassigned_to: reassign_to.to_string(),
                rows,
            },
        );
        Ok(Some(history_id))
    }

    /// Removes a category, reassigning dependent rows to `reassign_to`
    /// (`None` clears them).
    pub fn remove_category(
        book: &mut Cashbook,
        name: &str,
        reassign_to: Option<String>,
    ) -> ServiceResult<Option<Uuid>> {
        if let Some(replacement) = reassign_to.as_deref() {
            ensure_non_blank(replacement, "Replacement category")?;
        }
        let Some(position) = book.categories.iter().position(|entry| entry == name) else {
            return Ok(None);
        };

        let mut rows = Vec::new();
        for block in book.blocks.values_mut() {
            for row in block.rows.iter_mut() {
                if row.category.as_deref() == Some(name) {
                    rows.push(CategoryReassignment {
                        block_id: block.id,
                        row_id: row.id,
                        previous: std::mem::replace(&mut row.category, reassign_to.clone()),
                    });
                }
            }
        }
        book.categories.remove(position);
        if let Some(replacement) = reassign_to.as_deref() {
            book.add_to_master_list(MasterList::Categories, replacement);
        }
        book.touch();
        tracing::info!(category = name, rows = rows.len(), "deleting category");
        let history_id = history::push(
            book,
            format!("Deleted category \"{name}\""),
            UndoableEntity::Category {
                name: name.to_string(),
                reassigned_to: reassign_to,
                rows,
            },
        );
        Ok(Some(history_id))
    }
}
