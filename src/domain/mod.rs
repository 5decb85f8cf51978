//! Cashbook domain models, persistence-friendly types, and helpers.

pub mod band;
pub mod base;
pub mod block;
pub mod cashbook;
pub mod common;
pub mod fixed_bill;
pub mod interval;
pub mod schedule;
pub mod undo;

pub use band::{MonthAttribution, PayPeriodBand};
pub use base::{Base, BaseKind};
pub use block::{Block, BlockKind, FlowMode, Recurrence, Row};
pub use cashbook::{Cashbook, MasterList, StateDocument};
pub use fixed_bill::FixedBill;
pub use interval::{TimeInterval, TimeUnit};
pub use schedule::Schedule;
pub use undo::{
    CategoryReassignment, OwnerReassignment, UndoHistoryItem, UndoableEntity,
};
