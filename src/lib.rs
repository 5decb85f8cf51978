#![doc(test(attr(deny(warnings))))]

//! Bandbook tracks personal cash positions ("bases"), groups planned and
//! actual money movements into blocks of rows, and files those blocks into
//! calendar-bounded pay-period bands. Underneath sits a small transactional
//! engine: one-shot application and reversal of a row's balance effect,
//! deterministic date-to-band assignment, and snapshot-based one-level undo
//! for destructive deletes.

pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        core::utils::init_tracing();
        tracing::info!("Bandbook tracing initialized.");
    });
}
