mod common;

use common::{banded_book, checking_base, date, money, single_row_block};
use rust_decimal::Decimal;

use bandbook::core::services::{BaseService, BlockService};
use bandbook::domain::{Base, BaseKind, Block, BlockKind, BlockKind::*, Row};

#[test]
fn fixed_bill_execute_then_undo_restores_the_balance() {
    let (mut book, _, _) = banded_book();
    let base = checking_base(&mut book, "A", 100);
    let row = Row::new(date(2025, 1, 5), "Alex", money(40)).with_from(base);
    let (block_id, row_id) = single_row_block(&mut book, FixedBill, "Rent", date(2025, 1, 5), row);

    BlockService::execute_row(&mut book, block_id, row_id).unwrap();
    assert_eq!(book.base(base).unwrap().balance, money(60));
    assert!(book.block(block_id).unwrap().row(row_id).unwrap().executed);

    BlockService::undo_row(&mut book, block_id, row_id).unwrap();
    assert_eq!(book.base(base).unwrap().balance, money(100));
    assert!(!book.block(block_id).unwrap().row(row_id).unwrap().executed);
}

#[test]
fn round_trip_is_exact_for_every_block_kind() {
    for kind in [Income, FixedBill, Flow] {
        let (mut book, _, _) = banded_book();
        let from = checking_base(&mut book, "From", 100);
        let to = checking_base(&mut book, "To", 25);
        // Fractional cents exercise the decimal arithmetic.
        let row = Row::new(date(2025, 1, 5), "Alex", Decimal::new(3333, 2))
            .with_from(from)
            .with_to(to);
        let (block_id, row_id) = single_row_block(&mut book, kind, "Move", date(2025, 1, 5), row);

        BlockService::execute_row(&mut book, block_id, row_id).unwrap();
        BlockService::undo_row(&mut book, block_id, row_id).unwrap();

        assert_eq!(book.base(from).unwrap().balance, money(100), "{kind:?}");
        assert_eq!(book.base(to).unwrap().balance, money(25), "{kind:?}");
        assert!(!book.block(block_id).unwrap().row(row_id).unwrap().executed);
    }
}

#[test]
fn double_execute_applies_the_effect_once() {
    let (mut book, _, _) = banded_book();
    let to = checking_base(&mut book, "Pay", 0);
    let row = Row::new(date(2025, 1, 5), "Alex", money(75)).with_to(to);
    let (block_id, row_id) = single_row_block(&mut book, Income, "Salary", date(2025, 1, 5), row);

    BlockService::execute_row(&mut book, block_id, row_id).unwrap();
    BlockService::execute_row(&mut book, block_id, row_id).unwrap();
    assert_eq!(book.base(to).unwrap().balance, money(75));
}

#[test]
fn deleting_a_block_matches_manual_undo_then_delete() {
    let build = || {
        let (mut book, _, _) = banded_book();
        let from = checking_base(&mut book, "From", 500);
        let to = checking_base(&mut book, "To", 0);
        let first = Row::new(date(2025, 1, 5), "Alex", money(120))
            .with_from(from)
            .with_to(to);
        let second = Row::new(date(2025, 1, 6), "Alex", money(80)).with_from(from);
        let ids = (first.id, second.id);
        let block_id = BlockService::add(
            &mut book,
            Block::new(BlockKind::Flow, "Transfers", date(2025, 1, 5))
                .with_row(first)
                .with_row(second),
        )
        .unwrap();
        BlockService::execute_row(&mut book, block_id, ids.0).unwrap();
        BlockService::execute_row(&mut book, block_id, ids.1).unwrap();
        (book, from, to, block_id, ids)
    };

    // Path A: delete the block outright.
    let (mut direct, from_a, to_a, block_a, _) = build();
    BlockService::remove(&mut direct, block_a).unwrap();

    // Path B: undo every row by hand, then delete.
    let (mut manual, from_b, to_b, block_b, (r1, r2)) = build();
    BlockService::undo_row(&mut manual, block_b, r1).unwrap();
    BlockService::undo_row(&mut manual, block_b, r2).unwrap();
    BlockService::remove(&mut manual, block_b).unwrap();

    assert_eq!(
        direct.base(from_a).unwrap().balance,
        manual.base(from_b).unwrap().balance
    );
    assert_eq!(
        direct.base(to_a).unwrap().balance,
        manual.base(to_b).unwrap().balance
    );
    assert_eq!(direct.base(from_a).unwrap().balance, money(500));
    assert_eq!(direct.base(to_a).unwrap().balance, money(0));
}

#[test]
fn deleting_a_base_leaves_other_balances_and_references_alone() {
    let (mut book, _, _) = banded_book();
    let doomed = checking_base(&mut book, "A", 100);
    let survivor = checking_base(&mut book, "B", 50);
    let row = Row::new(date(2025, 1, 5), "Alex", money(10))
        .with_from(doomed)
        .with_to(survivor);
    let (block_id, row_id) = single_row_block(
        &mut book,
        BlockKind::Flow,
        "Move",
        date(2025, 1, 5),
        row,
    );
    BlockService::execute_row(&mut book, block_id, row_id).unwrap();
    assert_eq!(book.base(survivor).unwrap().balance, money(60));

    BaseService::remove(&mut book, doomed).unwrap();

    // No cascading reversal or null-out: the survivor keeps the credited
    // balance and the row keeps its now-dangling reference.
    assert_eq!(book.base(survivor).unwrap().balance, money(60));
    let row = book.block(block_id).unwrap().row(row_id).unwrap();
    assert_eq!(row.from_base, Some(doomed));
    assert!(row.executed);

    // Undoing the row later reverses only the leg that still resolves.
    BlockService::undo_row(&mut book, block_id, row_id).unwrap();
    assert_eq!(book.base(survivor).unwrap().balance, money(50));
}

#[test]
fn balances_are_never_written_outside_the_engine() {
    let (mut book, _, _) = banded_book();
    let base = checking_base(&mut book, "A", 100);
    BaseService::edit(&mut book, base, |b| {
        b.balance = money(0);
        b.name = "A renamed".into();
    })
    .unwrap();
    assert_eq!(book.base(base).unwrap().balance, money(100));

    // Re-adding a base under the old name is a separate entity.
    let other = BaseService::add(&mut book, Base::new("A", BaseKind::Checking)).unwrap();
    assert_ne!(base, other);
}
