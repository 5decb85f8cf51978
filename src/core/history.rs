//! Snapshot-based one-level undo for destructive deletes.
//!
//! Every destructive delete pushes a full-value snapshot before the
//! structural removal; `undo_delete` replays a snapshot back into the store
//! exactly once. The history is bounded and append-only; there is no redo.

use uuid::Uuid;

use crate::domain::cashbook::Cashbook;
use crate::domain::undo::{UndoHistoryItem, UndoableEntity};

/// Oldest items are evicted beyond this bound.
pub const UNDO_HISTORY_CAPACITY: usize = 20;

/// Pushes a snapshot and returns its history id for the caller's undo
/// affordance.
pub fn push(book: &mut Cashbook, label: impl Into<String>, entity: UndoableEntity) -> Uuid {
    let item = UndoHistoryItem::new(label, entity);
    let id = item.id;
    if book.undo_history.len() >= UNDO_HISTORY_CAPACITY {
        book.undo_history.remove(0);
    }
    book.undo_history.push(item);
    id
}

/// Restores the snapshot identified by `history_id` into its owning
/// collection, preserving original ids and timestamps. Returns `false` and
/// leaves state untouched when the item was already consumed or never
/// existed. The item is removed either way once found: snapshots are
/// single-use.
pub fn undo_delete(book: &mut Cashbook, history_id: Uuid) -> bool {
    let Some(index) = book
        .undo_history
        .iter()
        .position(|item| item.id == history_id)
    else {
        return false;
    };
    let item = book.undo_history.remove(index);
    tracing::info!(label = %item.label, "restoring deleted entity");
    match item.entity {
        UndoableEntity::Block(block) => {
            book.blocks.insert(block.id, block);
        }
        UndoableEntity::Base(base) => {
            book.bases.insert(base.id, base);
        }
        UndoableEntity::Band { band, blocks } => {
            let band_id = band.id;
            book.bands.insert(band_id, band);
            for mut block in blocks {
                block.band_id = Some(band_id);
                book.blocks.insert(block.id, block);
            }
        }
        UndoableEntity::Template(template) => {
            book.library.insert(template.id, template);
        }
        UndoableEntity::Schedule(schedule) => {
            book.schedules.insert(schedule.id, schedule);
        }
        UndoableEntity::FixedBill(bill) => {
            book.fixed_bills.insert(bill.id, bill);
        }
        UndoableEntity::Owner { name, rows, .. } => {
            if !book.owners.iter().any(|entry| entry == &name) {
                book.owners.push(name);
            }
            for change in rows {
                if let Some(block) = book.blocks.get_mut(&change.block_id) {
                    if let Some(row) = block.row_mut(change.row_id) {
                        row.owner = change.previous;
                    }
                }
            }
        }
        UndoableEntity::Category { name, rows, .. } => {
            if !book.categories.iter().any(|entry| entry == &name) {
                book.categories.push(name);
            }
            for change in rows {
                if let Some(block) = book.blocks.get_mut(&change.block_id) {
                    if let Some(row) = block.row_mut(change.row_id) {
                        row.category = change.previous;
                    }
                }
            }
        }
    }
    book.touch();
    true
}

/// Empties the history unconditionally (e.g. on full app reset).
pub fn clear(book: &mut Cashbook) {
    book.undo_history.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::base::{Base, BaseKind};

    #[test]
    fn history_is_bounded_and_evicts_oldest() {
        let mut book = Cashbook::new("History");
        let first = push(
            &mut book,
            "first",
            UndoableEntity::Base(Base::new("A", BaseKind::Checking)),
        );
        for i in 0..UNDO_HISTORY_CAPACITY {
            push(
                &mut book,
                format!("filler {i}"),
                UndoableEntity::Base(Base::new("B", BaseKind::Checking)),
            );
        }
        assert_eq!(book.undo_history.len(), UNDO_HISTORY_CAPACITY);
        assert!(!undo_delete(&mut book, first), "evicted item must be gone");
    }

    #[test]
    fn undo_is_single_use() {
        let mut book = Cashbook::new("History");
        let base = Base::new("Wallet", BaseKind::Custom("Cash".into()));
        let base_id = base.id;
        let history_id = push(&mut book, "delete base", UndoableEntity::Base(base));

        assert!(undo_delete(&mut book, history_id));
        assert!(book.base(base_id).is_some());
        assert!(!undo_delete(&mut book, history_id));
    }
}
