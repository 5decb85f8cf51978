use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::band::PayPeriodBand;
use crate::domain::base::Base;
use crate::domain::block::Block;
use crate::domain::fixed_bill::FixedBill;
use crate::domain::schedule::Schedule;
use crate::domain::undo::UndoHistoryItem;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Names one of the deduplicated, insertion-ordered string lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterList {
    Owners,
    Categories,
    Vendors,
}

/// The entity store: the single state object owning every collection.
///
/// Collections are id-keyed maps for O(1) lookup and update. Callers hold a
/// `&mut Cashbook` for exactly one mutator call at a time; nothing inside
/// keeps long-lived references out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cashbook {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bases: HashMap<Uuid, Base>,
    #[serde(default)]
    pub blocks: HashMap<Uuid, Block>,
    #[serde(default)]
    pub bands: HashMap<Uuid, PayPeriodBand>,
    #[serde(default)]
    pub library: HashMap<Uuid, Block>,
    #[serde(default)]
    pub schedules: HashMap<Uuid, Schedule>,
    #[serde(default)]
    pub fixed_bills: HashMap<Uuid, FixedBill>,
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub vendors: Vec<String>,
    /// Session-scoped: snapshots back the one-level undo toast and are not
    /// persisted or exported.
    #[serde(skip)]
    pub undo_history: Vec<UndoHistoryItem>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Cashbook::schema_version_default")]
    pub schema_version: u8,
}

/// Persisted wire shape: a single document wrapping the full state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    pub state: Cashbook,
}

impl Cashbook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bases: HashMap::new(),
            blocks: HashMap::new(),
            bands: HashMap::new(),
            library: HashMap::new(),
            schedules: HashMap::new(),
            fixed_bills: HashMap::new(),
            owners: Vec::new(),
            categories: Vec::new(),
            vendors: Vec::new(),
            undo_history: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn insert_base(&mut self, base: Base) -> Uuid {
        let id = base.id;
        self.bases.insert(id, base);
        self.touch();
        id
    }

    pub fn base(&self, id: Uuid) -> Option<&Base> {
        self.bases.get(&id)
    }

    pub fn base_mut(&mut self, id: Uuid) -> Option<&mut Base> {
        self.bases.get_mut(&id)
    }

    pub fn remove_base(&mut self, id: Uuid) -> Option<Base> {
        let removed = self.bases.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn insert_block(&mut self, block: Block) -> Uuid {
        let id = block.id;
        self.blocks.insert(id, block);
        self.touch();
        id
    }

    pub fn block(&self, id: Uuid) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn block_mut(&mut self, id: Uuid) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    pub fn remove_block(&mut self, id: Uuid) -> Option<Block> {
        let removed = self.blocks.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn insert_band(&mut self, band: PayPeriodBand) -> Uuid {
        let id = band.id;
        self.bands.insert(id, band);
        self.touch();
        id
    }

    pub fn band(&self, id: Uuid) -> Option<&PayPeriodBand> {
        self.bands.get(&id)
    }

    pub fn band_mut(&mut self, id: Uuid) -> Option<&mut PayPeriodBand> {
        self.bands.get_mut(&id)
    }

    pub fn remove_band(&mut self, id: Uuid) -> Option<PayPeriodBand> {
        let removed = self.bands.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Bands in assignment order: `(order, start_date, id)`. The id
    /// tiebreak keeps first-match deterministic over the arena map.
    pub fn ordered_bands(&self) -> Vec<&PayPeriodBand> {
        let mut bands: Vec<&PayPeriodBand> = self.bands.values().collect();
        bands.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.start_date.cmp(&b.start_date))
                .then(a.id.cmp(&b.id))
        });
        bands
    }

    /// Blocks currently filed under the given band.
    pub fn blocks_in_band(&self, band_id: Uuid) -> Vec<&Block> {
        self.blocks
            .values()
            .filter(|block| block.band_id == Some(band_id))
            .collect()
    }

    pub fn insert_template(&mut self, template: Block) -> Uuid {
        let id = template.id;
        self.library.insert(id, template);
        self.touch();
        id
    }

    pub fn template(&self, id: Uuid) -> Option<&Block> {
        self.library.get(&id)
    }

    pub fn remove_template(&mut self, id: Uuid) -> Option<Block> {
        let removed = self.library.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn insert_schedule(&mut self, schedule: Schedule) -> Uuid {
        let id = schedule.id;
        self.schedules.insert(id, schedule);
        self.touch();
        id
    }

    pub fn schedule(&self, id: Uuid) -> Option<&Schedule> {
        self.schedules.get(&id)
    }

    pub fn schedule_mut(&mut self, id: Uuid) -> Option<&mut Schedule> {
        self.schedules.get_mut(&id)
    }

    pub fn remove_schedule(&mut self, id: Uuid) -> Option<Schedule> {
        let removed = self.schedules.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn insert_fixed_bill(&mut self, bill: FixedBill) -> Uuid {
        let id = bill.id;
        self.fixed_bills.insert(id, bill);
        self.touch();
        id
    }

    pub fn fixed_bill(&self, id: Uuid) -> Option<&FixedBill> {
        self.fixed_bills.get(&id)
    }

    pub fn fixed_bill_mut(&mut self, id: Uuid) -> Option<&mut FixedBill> {
        self.fixed_bills.get_mut(&id)
    }

    pub fn remove_fixed_bill(&mut self, id: Uuid) -> Option<FixedBill> {
        let removed = self.fixed_bills.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn master_list(&self, list: MasterList) -> &[String] {
        match list {
            MasterList::Owners => &self.owners,
            MasterList::Categories => &self.categories,
            MasterList::Vendors => &self.vendors,
        }
    }

    pub(crate) fn master_list_mut(&mut self, list: MasterList) -> &mut Vec<String> {
        match list {
            MasterList::Owners => &mut self.owners,
            MasterList::Categories => &mut self.categories,
            MasterList::Vendors => &mut self.vendors,
        }
    }

    /// Appends a value to a master list, case-sensitive. A value already
    /// present is left alone; returns whether the list changed.
    pub fn add_to_master_list(&mut self, list: MasterList, value: &str) -> bool {
        let entries = self.master_list_mut(list);
        if entries.iter().any(|entry| entry == value) {
            return false;
        }
        entries.push(value.to_string());
        self.touch();
        true
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::base::BaseKind;

    #[test]
    fn master_list_add_is_a_dedup_noop() {
        let mut book = Cashbook::new("Test");
        assert!(book.add_to_master_list(MasterList::Owners, "Alex"));
        assert!(!book.add_to_master_list(MasterList::Owners, "Alex"));
        // Case-sensitive: a different casing is a distinct value.
        assert!(book.add_to_master_list(MasterList::Owners, "alex"));
        let owners: Vec<&str> = book
            .master_list(MasterList::Owners)
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(owners, ["Alex", "alex"]);
    }

    #[test]
    fn insert_and_remove_base_touch_the_book() {
        let mut book = Cashbook::new("Test");
        let before = book.updated_at;
        let id = book.insert_base(Base::new("Checking", BaseKind::Checking));
        assert!(book.base(id).is_some());
        assert!(book.updated_at >= before);
        assert!(book.remove_base(id).is_some());
        assert!(book.base(id).is_none());
    }
}
