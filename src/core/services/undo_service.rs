use uuid::Uuid;

use crate::core::history;
use crate::domain::cashbook::Cashbook;
use crate::domain::undo::UndoHistoryItem;

/// Caller-facing surface of the undo history manager.
pub struct UndoService;

impl UndoService {
    /// Restores a snapshot exactly once. `false` means the item was
    /// already consumed or never existed: an expected race between the
    /// undo affordance and state changes, not an error.
    pub fn undo_delete(book: &mut Cashbook, history_id: Uuid) -> bool {
        history::undo_delete(book, history_id)
    }

    pub fn clear_history(book: &mut Cashbook) {
        history::clear(book);
    }

    pub fn history(book: &Cashbook) -> &[UndoHistoryItem] {
        &book.undo_history
    }
}
