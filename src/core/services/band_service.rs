use chrono::Utc;
use uuid::Uuid;

use crate::core::services::{ensure_non_blank, ServiceError, ServiceResult};
use crate::core::{assigner, history};
use crate::domain::band::PayPeriodBand;
use crate::domain::cashbook::Cashbook;
use crate::domain::undo::UndoableEntity;

/// Band CRUD plus the derived-field and re-filing triggers: boundary or
/// rule edits recompute `display_month` and re-run block assignment.
pub struct BandService;

impl BandService {
    pub fn add(book: &mut Cashbook, mut band: PayPeriodBand) -> ServiceResult<Uuid> {
        validate_band(&band)?;
        band.refresh_display_month();
        let id = book.insert_band(band);
        assigner::reassign_all(book);
        Ok(id)
    }

    pub fn edit<F>(book: &mut Cashbook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut PayPeriodBand),
    {
        let Some(existing) = book.band(id) else {
            return Ok(());
        };
        let snapshot = existing.clone();
        let mut updated = snapshot.clone();
        mutator(&mut updated);
        validate_band(&updated)?;

        updated.id = snapshot.id;
        updated.created_at = snapshot.created_at;
        updated.refresh_display_month();
        updated.updated_at = Utc::now();
        let boundaries_changed = updated.start_date != snapshot.start_date
            || updated.end_date != snapshot.end_date
            || updated.archived != snapshot.archived
            || updated.order != snapshot.order;
        book.bands.insert(id, updated);
        book.touch();
        if boundaries_changed {
            assigner::reassign_all(book);
        }
        Ok(())
    }

    /// Snapshots the band together with every block currently filed under
    /// it, clears those blocks' `band_id` to unassigned, then removes the
    /// band. Blocks are never deleted or refiled here; a later reassign
    /// may pick them up.
    pub fn remove(book: &mut Cashbook, id: Uuid) -> ServiceResult<Option<Uuid>> {
        let Some(band) = book.remove_band(id) else {
            return Ok(None);
        };
        let held: Vec<Uuid> = book
            .blocks
            .values()
            .filter(|block| block.band_id == Some(id))
            .map(|block| block.id)
            .collect();
        let mut blocks = Vec::with_capacity(held.len());
        for block_id in held {
            if let Some(block) = book.block_mut(block_id) {
                blocks.push(block.clone());
                block.band_id = None;
            }
        }
        tracing::info!(%id, blocks = blocks.len(), "deleting band");
        let label = format!("Deleted band \"{}\"", band.title);
        let history_id = history::push(book, label, UndoableEntity::Band { band, blocks });
        Ok(Some(history_id))
    }

    pub fn archive(book: &mut Cashbook, id: Uuid) -> ServiceResult<()> {
        Self::set_archived(book, id, true)
    }

    pub fn unarchive(book: &mut Cashbook, id: Uuid) -> ServiceResult<()> {
        Self::set_archived(book, id, false)
    }

    /// Manual bulk re-filing trigger; returns how many blocks moved.
    pub fn reassign_blocks(book: &mut Cashbook) -> ServiceResult<usize> {
        Ok(assigner::reassign_all(book))
    }

    /// Bands in assignment order.
    pub fn list(book: &Cashbook) -> Vec<&PayPeriodBand> {
        book.ordered_bands()
    }

    fn set_archived(book: &mut Cashbook, id: Uuid, archived: bool) -> ServiceResult<()> {
        let Some(band) = book.band_mut(id) else {
            return Ok(());
        };
        if band.archived == archived {
            return Ok(());
        }
        band.archived = archived;
        band.touch();
        book.touch();
        assigner::reassign_all(book);
        Ok(())
    }
}

fn validate_band(band: &PayPeriodBand) -> ServiceResult<()> {
    ensure_non_blank(&band.title, "Band title")?;
    if band.end_date < band.start_date {
        return Err(ServiceError::Invalid(
            "Band end date must not precede its start".into(),
        ));
    }
    Ok(())
}
