//! Applies and reverses the balance effect of a single row.
//!
//! The two operations are symmetric by construction and guarded: `execute`
//! is a no-op when the row is already executed, `undo` when it is not. The
//! effect table is keyed by the owning block's kind; a row whose relevant
//! base reference is absent or no longer resolves simply skips that leg.
//! There is no ledger of historical executions beyond the `executed` flag:
//! reversal reads the row's current amount, which is exact only while the
//! row was not edited in between.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::base::Base;
use crate::domain::block::BlockKind;
use crate::domain::cashbook::Cashbook;

/// Applies the row's balance effect and marks it executed. Returns whether
/// anything changed (missing block/row and already-executed rows no-op).
pub fn execute(book: &mut Cashbook, block_id: Uuid, row_id: Uuid) -> bool {
    toggle(book, block_id, row_id, Direction::Apply)
}

/// Reverses the row's balance effect and clears the executed flag. Returns
/// whether anything changed.
pub fn undo(book: &mut Cashbook, block_id: Uuid, row_id: Uuid) -> bool {
    toggle(book, block_id, row_id, Direction::Reverse)
}

/// Reverses every currently-executed row of the block, returning how many
/// were reverted. Used before a block is discarded so balances never retain
/// the effect of a row whose owning block no longer exists.
pub fn reverse_block(book: &mut Cashbook, block_id: Uuid) -> usize {
    let executed = match book.block(block_id) {
        Some(block) => block.executed_row_ids(),
        None => return 0,
    };
    let mut reverted = 0;
    for row_id in executed {
        if undo(book, block_id, row_id) {
            reverted += 1;
        }
    }
    reverted
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Apply,
    Reverse,
}

fn toggle(book: &mut Cashbook, block_id: Uuid, row_id: Uuid, direction: Direction) -> bool {
    let Cashbook {
        blocks,
        bases,
        updated_at,
        ..
    } = book;
    let Some(block) = blocks.get_mut(&block_id) else {
        return false;
    };
    let kind = block.kind;
    let Some(row) = block.row_mut(row_id) else {
        return false;
    };
    let already = row.executed;
    if (direction == Direction::Apply) == already {
        return false;
    }

    let amount = row.amount;
    let (debit_leg, credit_leg) = match kind {
        BlockKind::Income => (None, row.to_base),
        BlockKind::FixedBill => (row.from_base, None),
        BlockKind::Flow => (row.from_base, row.to_base),
    };
    match direction {
        Direction::Apply => {
            adjust(bases, debit_leg, -amount);
            adjust(bases, credit_leg, amount);
            row.executed = true;
        }
        Direction::Reverse => {
            adjust(bases, debit_leg, amount);
            adjust(bases, credit_leg, -amount);
            row.executed = false;
        }
    }
    tracing::debug!(
        block = %block_id,
        row = %row_id,
        applied = direction == Direction::Apply,
        "toggled row execution"
    );
    block.touch();
    *updated_at = block.updated_at;
    true
}

fn adjust(bases: &mut HashMap<Uuid, Base>, leg: Option<Uuid>, delta: Decimal) {
    let Some(id) = leg else { return };
    // Dangling references are preserved as-is; the leg is skipped.
    let Some(base) = bases.get_mut(&id) else { return };
    base.balance += delta;
    base.updated_at = chrono::Utc::now();
}
