use chrono::Utc;
use uuid::Uuid;

use crate::core::services::{ensure_non_blank, ensure_non_negative, ServiceError, ServiceResult};
use crate::core::{assigner, engine, history};
use crate::domain::block::Block;
use crate::domain::cashbook::Cashbook;
use crate::domain::undo::UndoableEntity;

/// Validated CRUD over blocks plus the cross-cutting triggers: creating a
/// block or changing its date re-derives the band assignment, toggling a
/// row's executed flag goes through the ledger engine, and deletion runs
/// the snapshot-then-remove undo protocol.
pub struct BlockService;

impl BlockService {
    pub fn add(book: &mut Cashbook, mut block: Block) -> ServiceResult<Uuid> {
        validate_block(&block)?;
        block.is_template = false;
        block.band_id = assigner::assign_band(block.date, book);
        Ok(book.insert_block(block))
    }

    /// Applies the mutator to a copy, validates, then commits. `executed`
    /// flags are re-derived from the pre-edit rows (the engine is the only
    /// writer of execution state), and `band_id` is recomputed only when
    /// the date actually changed.
    pub fn edit<F>(book: &mut Cashbook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut Block),
    {
        let Some(existing) = book.block(id) else {
            return Ok(());
        };
        let snapshot = existing.clone();
        let mut updated = snapshot.clone();
        mutator(&mut updated);
        validate_block(&updated)?;

        updated.id = snapshot.id;
        updated.created_at = snapshot.created_at;
        updated.is_template = snapshot.is_template;
        for row in updated.rows.iter_mut() {
            row.executed = snapshot
                .rows
                .iter()
                .find(|prior| prior.id == row.id)
                .map_or(false, |prior| prior.executed);
        }
        updated.band_id = if updated.date != snapshot.date {
            assigner::assign_band(updated.date, book)
        } else {
            snapshot.band_id
        };
        updated.updated_at = Utc::now();
        book.blocks.insert(id, updated);
        book.touch();
        Ok(())
    }

    /// Reverses every executed row, snapshots the (now all-unexecuted)
    /// block, then removes it, so balances never retain the effect of a row
    /// whose owning block no longer exists. Returns the history id.
    pub fn remove(book: &mut Cashbook, id: Uuid) -> ServiceResult<Option<Uuid>> {
        if book.block(id).is_none() {
            return Ok(None);
        }
        let reverted = engine::reverse_block(book, id);
        let Some(block) = book.remove_block(id) else {
            return Ok(None);
        };
        tracing::info!(%id, reverted, "deleting block");
        let label = format!("Deleted block \"{}\"", block.title);
        let history_id = history::push(book, label, UndoableEntity::Block(block));
        Ok(Some(history_id))
    }

    /// Explicit ad-hoc filing. A stale band id is a silent no-op; `None`
    /// unfiles the block.
    pub fn move_to_band(
        book: &mut Cashbook,
        block_id: Uuid,
        band_id: Option<Uuid>,
    ) -> ServiceResult<()> {
        if let Some(target) = band_id {
            if book.band(target).is_none() {
                return Ok(());
            }
        }
        let Some(block) = book.block_mut(block_id) else {
            return Ok(());
        };
        block.band_id = band_id;
        block.touch();
        book.touch();
        Ok(())
    }

    pub fn execute_row(book: &mut Cashbook, block_id: Uuid, row_id: Uuid) -> ServiceResult<()> {
        engine::execute(book, block_id, row_id);
        Ok(())
    }

    pub fn undo_row(book: &mut Cashbook, block_id: Uuid, row_id: Uuid) -> ServiceResult<()> {
        engine::undo(book, block_id, row_id);
        Ok(())
    }

    /// Blocks sorted by date (newest last) for stable presentation.
    pub fn list(book: &Cashbook) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = book.blocks.values().collect();
        blocks.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        blocks
    }
}

fn validate_block(block: &Block) -> ServiceResult<()> {
    ensure_non_blank(&block.title, "Block title")?;
    for row in &block.rows {
        ensure_non_negative(row.amount, "Row amount")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::band::PayPeriodBand;
    use crate::domain::base::{Base, BaseKind};
    use crate::domain::block::{BlockKind, Row};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn banded_book() -> (Cashbook, Uuid, Uuid) {
        let mut book = Cashbook::new("Blocks");
        let b1 = book.insert_band(PayPeriodBand::new(
            "b1",
            date(2025, 1, 1),
            date(2025, 1, 15),
            0,
        ));
        let b2 = book.insert_band(PayPeriodBand::new(
            "b2",
            date(2025, 1, 16),
            date(2025, 1, 31),
            1,
        ));
        (book, b1, b2)
    }

    #[test]
    fn add_assigns_the_covering_band() {
        let (mut book, _, b2) = banded_book();
        let id = BlockService::add(
            &mut book,
            Block::new(BlockKind::Income, "Pay", date(2025, 1, 20)),
        )
        .unwrap();
        assert_eq!(book.block(id).unwrap().band_id, Some(b2));
    }

    #[test]
    fn date_change_recomputes_the_band_without_a_manual_call() {
        let (mut book, b1, b2) = banded_book();
        let id = BlockService::add(
            &mut book,
            Block::new(BlockKind::Income, "Pay", date(2025, 1, 20)),
        )
        .unwrap();
        assert_eq!(book.block(id).unwrap().band_id, Some(b2));

        BlockService::edit(&mut book, id, |block| {
            block.date = date(2025, 1, 5);
        })
        .unwrap();
        assert_eq!(book.block(id).unwrap().band_id, Some(b1));
    }

    #[test]
    fn edit_cannot_flip_executed_flags() {
        let (mut book, _, _) = banded_book();
        let base = book.insert_base(Base::new("Checking", BaseKind::Checking));
        let row = Row::new(date(2025, 1, 2), "Alex", Decimal::new(5, 0)).with_from(base);
        let row_id = row.id;
        let id = BlockService::add(
            &mut book,
            Block::new(BlockKind::FixedBill, "Bill", date(2025, 1, 2)).with_row(row),
        )
        .unwrap();

        BlockService::edit(&mut book, id, |block| {
            block.row_mut(row_id).unwrap().executed = true;
        })
        .unwrap();
        assert!(!book.block(id).unwrap().row(row_id).unwrap().executed);
    }

    #[test]
    fn failed_validation_leaves_the_block_untouched() {
        let (mut book, _, _) = banded_book();
        let id = BlockService::add(
            &mut book,
            Block::new(BlockKind::Income, "Pay", date(2025, 1, 20)),
        )
        .unwrap();
        let err = BlockService::edit(&mut book, id, |block| {
            block.title = "  ".into();
        })
        .expect_err("blank title must be rejected");
        assert!(matches!(err, ServiceError::Invalid(_)));
        assert_eq!(book.block(id).unwrap().title, "Pay");
    }

    #[test]
    fn move_to_band_ignores_stale_band_ids() {
        let (mut book, b1, _) = banded_book();
        let id = BlockService::add(
            &mut book,
            Block::new(BlockKind::Income, "Pay", date(2025, 2, 10)),
        )
        .unwrap();
        assert_eq!(book.block(id).unwrap().band_id, None);

        BlockService::move_to_band(&mut book, id, Some(Uuid::new_v4())).unwrap();
        assert_eq!(book.block(id).unwrap().band_id, None);

        BlockService::move_to_band(&mut book, id, Some(b1)).unwrap();
        assert_eq!(book.block(id).unwrap().band_id, Some(b1));
    }

    #[test]
    fn remove_reverses_executed_rows_first() {
        let (mut book, _, _) = banded_book();
        let base = book.insert_base(
            Base::new("Checking", BaseKind::Checking).with_balance(Decimal::new(100, 0)),
        );
        let row = Row::new(date(2025, 1, 2), "Alex", Decimal::new(40, 0)).with_from(base);
        let row_id = row.id;
        let id = BlockService::add(
            &mut book,
            Block::new(BlockKind::FixedBill, "Bill", date(2025, 1, 2)).with_row(row),
        )
        .unwrap();
        BlockService::execute_row(&mut book, id, row_id).unwrap();
        assert_eq!(book.base(base).unwrap().balance, Decimal::new(60, 0));

        BlockService::remove(&mut book, id).unwrap();
        assert_eq!(book.base(base).unwrap().balance, Decimal::new(100, 0));
        assert!(book.block(id).is_none());
    }
}
