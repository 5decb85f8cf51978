#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use bandbook::core::services::{BandService, BaseService, BlockService};
use bandbook::domain::{Base, BaseKind, Block, BlockKind, Cashbook, PayPeriodBand, Row};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn money(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

/// A book with two January 2025 bands: `[1st..15th]` and `[16th..31st]`.
pub fn banded_book() -> (Cashbook, Uuid, Uuid) {
    let mut book = Cashbook::new("Test book");
    let b1 = BandService::add(
        &mut book,
        PayPeriodBand::new("b1", date(2025, 1, 1), date(2025, 1, 15), 0),
    )
    .unwrap();
    let b2 = BandService::add(
        &mut book,
        PayPeriodBand::new("b2", date(2025, 1, 16), date(2025, 1, 31), 1),
    )
    .unwrap();
    (book, b1, b2)
}

pub fn checking_base(book: &mut Cashbook, name: &str, balance: i64) -> Uuid {
    BaseService::add(
        book,
        Base::new(name, BaseKind::Checking).with_balance(money(balance)),
    )
    .unwrap()
}

/// Adds a single-row block and returns `(block_id, row_id)`.
pub fn single_row_block(
    book: &mut Cashbook,
    kind: BlockKind,
    title: &str,
    on: NaiveDate,
    row: Row,
) -> (Uuid, Uuid) {
    let row_id = row.id;
    let block_id = BlockService::add(book, Block::new(kind, title, on).with_row(row)).unwrap();
    (block_id, row_id)
}
