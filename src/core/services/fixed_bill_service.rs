use chrono::Utc;
use uuid::Uuid;

use crate::core::history;
use crate::core::services::{
    duplicate_name, ensure_non_blank, ensure_non_negative, BlockService, ServiceError,
    ServiceResult,
};
use crate::domain::block::{Block, BlockKind, Row};
use crate::domain::cashbook::Cashbook;
use crate::domain::fixed_bill::FixedBill;
use crate::domain::undo::UndoableEntity;

pub struct FixedBillService;

impl FixedBillService {
    pub fn add(book: &mut Cashbook, bill: FixedBill) -> ServiceResult<Uuid> {
        validate_bill(book, &bill, None)?;
        Ok(book.insert_fixed_bill(bill))
    }

    pub fn edit<F>(book: &mut Cashbook, id: Uuid, mutator: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut FixedBill),
    {
        let Some(existing) = book.fixed_bill(id) else {
            return Ok(());
        };
        let snapshot = existing.clone();
        let mut updated = snapshot.clone();
        mutator(&mut updated);
        validate_bill(book, &updated, Some(id))?;
        updated.id = snapshot.id;
        updated.created_at = snapshot.created_at;
        updated.touch();
        book.fixed_bills.insert(id, updated);
        book.touch();
        Ok(())
    }

    pub fn remove(book: &mut Cashbook, id: Uuid) -> ServiceResult<Option<Uuid>> {
        let Some(bill) = book.remove_fixed_bill(id) else {
            return Ok(None);
        };
        tracing::info!(%id, "deleting fixed bill");
        let label = format!("Deleted fixed bill \"{}\"", bill.name);
        let history_id = history::push(book, label, UndoableEntity::FixedBill(bill));
        Ok(Some(history_id))
    }

    /// Builds an unexecuted Fixed Bill block for the given month from every
    /// standing bill, one row per bill dated at its due date. Returns
    /// `None` when there are no bills to prefill.
    pub fn prefill_block(
        book: &mut Cashbook,
        year: i32,
        month: u32,
        owner: &str,
    ) -> ServiceResult<Option<Uuid>> {
        ensure_non_blank(owner, "Row owner")?;
        let mut bills: Vec<&FixedBill> = book.fixed_bills.values().collect();
        if bills.is_empty() {
            return Ok(None);
        }
        bills.sort_by(|a, b| a.due_day.cmp(&b.due_day).then(a.name.cmp(&b.name)));

        let mut block = Block::new(
            BlockKind::FixedBill,
            format!("Fixed bills {year:04}-{month:02}"),
            bills[0].due_date_in(year, month),
        );
        for bill in bills {
            let mut row = Row::new(bill.due_date_in(year, month), owner, bill.amount);
            row.from_base = bill.from_base;
            row.category = bill.category.clone();
            row.notes = bill.notes.clone();
            block.rows.push(row);
        }
        BlockService::add(book, block).map(Some)
    }

    /// Bills sorted by due day.
    pub fn list(book: &Cashbook) -> Vec<&FixedBill> {
        let mut bills: Vec<&FixedBill> = book.fixed_bills.values().collect();
        bills.sort_by(|a, b| a.due_day.cmp(&b.due_day).then(a.name.cmp(&b.name)));
        bills
    }
}

fn validate_bill(book: &Cashbook, bill: &FixedBill, exclude: Option<Uuid>) -> ServiceResult<()> {
    ensure_non_blank(&bill.name, "Fixed bill name")?;
    ensure_non_negative(bill.amount, "Fixed bill amount")?;
    if !(1..=31).contains(&bill.due_day) {
        return Err(ServiceError::Invalid(
            "Fixed bill due day must fall within 1..=31".into(),
        ));
    }
    if duplicate_name(book.fixed_bills.values(), exclude, &bill.name) {
        return Err(ServiceError::Invalid(format!(
            "Fixed bill `{}` already exists",
            bill.name
        )));
    }
    Ok(())
}
