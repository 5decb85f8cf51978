mod common;

use common::{banded_book, checking_base, date, money, single_row_block};

use bandbook::core::services::{
    BaseService, BlockService, FixedBillService, LibraryService, ListService, ScheduleService,
    UndoService,
};
use bandbook::domain::{
    Block, BlockKind, FixedBill, MasterList, Row, Schedule, TimeInterval, TimeUnit,
};

#[test]
fn undo_delete_is_consumed_on_first_use() {
    let (mut book, _, _) = banded_book();
    let block_id = BlockService::add(
        &mut book,
        Block::new(BlockKind::Income, "Pay", date(2025, 1, 10)),
    )
    .unwrap();

    let history_id = BlockService::remove(&mut book, block_id).unwrap().unwrap();
    assert!(book.block(block_id).is_none());

    assert!(UndoService::undo_delete(&mut book, history_id));
    assert!(book.block(block_id).is_some());
    let restored_title = book.block(block_id).unwrap().title.clone();

    assert!(!UndoService::undo_delete(&mut book, history_id));
    assert_eq!(book.block(block_id).unwrap().title, restored_title);
}

#[test]
fn restored_entities_keep_their_ids_and_timestamps() {
    let (mut book, _, _) = banded_book();
    let base_id = checking_base(&mut book, "Vault", 40);
    let created_at = book.base(base_id).unwrap().created_at;

    let history_id = BaseService::remove(&mut book, base_id).unwrap().unwrap();
    assert!(UndoService::undo_delete(&mut book, history_id));

    let restored = book.base(base_id).unwrap();
    assert_eq!(restored.id, base_id);
    assert_eq!(restored.created_at, created_at);
    assert_eq!(restored.balance, money(40));
}

#[test]
fn every_standing_entity_kind_restores() {
    let (mut book, _, _) = banded_book();

    // Template.
    let block_id = BlockService::add(
        &mut book,
        Block::new(BlockKind::Income, "Pay", date(2025, 1, 3)),
    )
    .unwrap();
    let template_id = LibraryService::save_as_template(&mut book, block_id)
        .unwrap()
        .unwrap();

    // Schedule referencing the template.
    let schedule_id = ScheduleService::add(
        &mut book,
        Schedule::new(
            "Payday",
            template_id,
            TimeInterval {
                every: 2,
                unit: TimeUnit::Week,
            },
            date(2025, 1, 3),
        ),
    )
    .unwrap();

    // Fixed bill.
    let bill_id = FixedBillService::add(&mut book, FixedBill::new("Rent", money(1200), 1)).unwrap();

    let undo_schedule = ScheduleService::remove(&mut book, schedule_id)
        .unwrap()
        .unwrap();
    let undo_template = LibraryService::remove(&mut book, template_id)
        .unwrap()
        .unwrap();
    let undo_bill = FixedBillService::remove(&mut book, bill_id).unwrap().unwrap();
    assert!(book.schedule(schedule_id).is_none());
    assert!(book.template(template_id).is_none());
    assert!(book.fixed_bill(bill_id).is_none());

    assert!(UndoService::undo_delete(&mut book, undo_bill));
    assert!(UndoService::undo_delete(&mut book, undo_template));
    assert!(UndoService::undo_delete(&mut book, undo_schedule));
    assert_eq!(book.schedule(schedule_id).unwrap().title, "Payday");
    assert_eq!(book.template(template_id).unwrap().title, "Pay");
    assert_eq!(book.fixed_bill(bill_id).unwrap().name, "Rent");
}

#[test]
fn owner_and_category_deletes_replay_row_values() {
    let (mut book, _, _) = banded_book();
    ListService::add(&mut book, MasterList::Owners, "Alex").unwrap();
    ListService::add(&mut book, MasterList::Owners, "Sam").unwrap();
    ListService::add(&mut book, MasterList::Categories, "Food").unwrap();

    let row = Row::new(date(2025, 1, 5), "Alex", money(12)).with_category("Food");
    let (block_id, row_id) =
        single_row_block(&mut book, BlockKind::Income, "Misc", date(2025, 1, 5), row);

    let owner_undo = ListService::remove_owner(&mut book, "Alex", "Sam")
        .unwrap()
        .unwrap();
    let category_undo = ListService::remove_category(&mut book, "Food", None)
        .unwrap()
        .unwrap();
    let row_view = book.block(block_id).unwrap().row(row_id).unwrap();
    assert_eq!(row_view.owner, "Sam");
    assert_eq!(row_view.category, None);

    assert!(UndoService::undo_delete(&mut book, category_undo));
    assert!(UndoService::undo_delete(&mut book, owner_undo));
    let row_view = book.block(block_id).unwrap().row(row_id).unwrap();
    assert_eq!(row_view.owner, "Alex");
    assert_eq!(row_view.category, Some("Food".to_string()));
    assert!(book.owners.iter().any(|entry| entry == "Alex"));
    assert!(book.categories.iter().any(|entry| entry == "Food"));
}

#[test]
fn clear_history_drops_pending_undo_items() {
    let (mut book, _, _) = banded_book();
    let base_id = checking_base(&mut book, "Gone", 0);
    let history_id = BaseService::remove(&mut book, base_id).unwrap().unwrap();

    UndoService::clear_history(&mut book);
    assert!(UndoService::history(&book).is_empty());
    assert!(!UndoService::undo_delete(&mut book, history_id));
    assert!(book.base(base_id).is_none());
}
