use crate::core::history;
use crate::core::services::ServiceResult;
use crate::domain::cashbook::{Cashbook, StateDocument};
use crate::errors::StoreError;

/// Whole-book import/export and reset.
pub struct DataService;

impl DataService {
    /// Serializes the full state as a single `{ "state": ... }` document.
    pub fn export_data(book: &Cashbook) -> ServiceResult<String> {
        let document = StateDocument {
            state: book.clone(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(StoreError::from)?;
        Ok(json)
    }

    /// Accepts the same shape `export_data` produces. Missing collections
    /// default to empty; malformed JSON is reported as a failure and the
    /// current state is left untouched, never a partial merge.
    pub fn import_data(book: &mut Cashbook, payload: &str) -> ServiceResult<()> {
        let document: StateDocument =
            serde_json::from_str(payload).map_err(StoreError::from)?;
        *book = document.state;
        book.touch();
        tracing::info!("imported book state");
        Ok(())
    }

    /// Full reset: every collection and the undo history are emptied; the
    /// book keeps its identity.
    pub fn clear_all(book: &mut Cashbook) {
        book.bases.clear();
        book.blocks.clear();
        book.bands.clear();
        book.library.clear();
        book.schedules.clear();
        book.fixed_bills.clear();
        book.owners.clear();
        book.categories.clear();
        book.vendors.clear();
        history::clear(book);
        book.touch();
        tracing::info!("cleared all book state");
    }
}
