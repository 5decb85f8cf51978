//! Maps block dates to pay-period bands.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::cashbook::Cashbook;

/// Returns the id of the first band (in `(order, start_date, id)` order)
/// whose inclusive interval contains `date`, or `None` when no band covers
/// it. Archived bands never match. Overlaps resolve to the earlier band;
/// callers keep bands overlap-free for deterministic results.
pub fn assign_band(date: NaiveDate, book: &Cashbook) -> Option<Uuid> {
    book.ordered_bands()
        .into_iter()
        .find(|band| !band.archived && band.contains(date))
        .map(|band| band.id)
}

/// Recomputes `band_id` for every block from its current date and returns
/// how many assignments actually changed. Invoked after any band boundary
/// edit, archive toggle, or bulk regeneration, so existing blocks track
/// band reshuffles without manual re-filing.
pub fn reassign_all(book: &mut Cashbook) -> usize {
    let windows: Vec<(Uuid, NaiveDate, NaiveDate)> = book
        .ordered_bands()
        .into_iter()
        .filter(|band| !band.archived)
        .map(|band| (band.id, band.start_date, band.end_date))
        .collect();

    let mut changed = 0;
    for block in book.blocks.values_mut() {
        let target = windows
            .iter()
            .find(|(_, start, end)| block.date >= *start && block.date <= *end)
            .map(|(id, _, _)| *id);
        if block.band_id != target {
            block.band_id = target;
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::debug!(changed, "reassigned blocks to bands");
        book.touch();
    }
    changed
}
