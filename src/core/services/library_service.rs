use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::core::services::ServiceResult;
use crate::core::{assigner, history};
use crate::domain::block::{Block, Row};
use crate::domain::cashbook::Cashbook;
use crate::domain::undo::UndoableEntity;

/// The reusable-block library. Templates are blocks flagged `is_template`,
/// never filed into a band, and never executed; stamping instantiates a
/// concrete block back into the book.
pub struct LibraryService;

impl LibraryService {
    /// Clones a live block into the library under a fresh id, stripped of
    /// its filing and execution state.
    pub fn save_as_template(book: &mut Cashbook, block_id: Uuid) -> ServiceResult<Option<Uuid>> {
        let Some(block) = book.block(block_id) else {
            return Ok(None);
        };
        let mut template = block.clone();
        template.id = Uuid::new_v4();
        template.band_id = None;
        template.is_template = true;
        template.rows = detached_rows(&template.rows, template.date);
        let now = Utc::now();
        template.created_at = now;
        template.updated_at = now;
        Ok(Some(book.insert_template(template)))
    }

    /// Instantiates a template into the book at the given date: fresh ids,
    /// rows dated at the stamp date and unexecuted, band assigned from the
    /// date. Returns the new block id, or `None` for a stale template id.
    pub fn stamp(
        book: &mut Cashbook,
        template_id: Uuid,
        date: NaiveDate,
    ) -> ServiceResult<Option<Uuid>> {
        let Some(template) = book.template(template_id) else {
            return Ok(None);
        };
        let mut block = template.clone();
        block.id = Uuid::new_v4();
        block.is_template = false;
        block.date = date;
        block.rows = detached_rows(&block.rows, date);
        let now = Utc::now();
        block.created_at = now;
        block.updated_at = now;
        block.band_id = assigner::assign_band(date, book);
        Ok(Some(book.insert_block(block)))
    }

    pub fn remove(book: &mut Cashbook, template_id: Uuid) -> ServiceResult<Option<Uuid>> {
        let Some(template) = book.remove_template(template_id) else {
            return Ok(None);
        };
        tracing::info!(%template_id, "removing template from library");
        let label = format!("Removed template \"{}\"", template.title);
        let history_id = history::push(book, label, UndoableEntity::Template(template));
        Ok(Some(history_id))
    }

    /// Templates sorted by title for stable presentation.
    pub fn list(book: &Cashbook) -> Vec<&Block> {
        let mut templates: Vec<&Block> = book.library.values().collect();
        templates.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        templates
    }
}

fn detached_rows(rows: &[Row], date: NaiveDate) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            let mut detached = row.clone();
            detached.id = Uuid::new_v4();
            detached.date = date;
            detached.executed = false;
            detached
        })
        .collect()
}
