//! Banks already harvested, per world map.
//!
//! The ledger only grows: saves and the start-up load add to it, nothing
//! removes from it.

use crate::location::*;
use fnv::{FnvHashMap, FnvHashSet};

/// Inclusive range of bank coordinates covering a window.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BankRange {
    pub min: BankLocation,
    pub max: BankLocation,
}

impl BankRange {
    /// Banks owning the window corners; every tile between them falls in the
    /// range.
    pub fn covering(top_left: WorldLocation, bottom_right: WorldLocation, bank_size: i32) -> Self {
        BankRange {
            min: top_left.bank(bank_size),
            max: bottom_right.bank(bank_size),
        }
    }

    /// Both ends inclusive, each axis checked against its own bounds.
    pub fn contains(&self, bank: BankLocation) -> bool {
        bank.x() >= self.min.x()
            && bank.x() <= self.max.x()
            && bank.y() >= self.min.y()
            && bank.y() <= self.max.y()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConsumedBankLedger {
    banks: FnvHashMap<MapIndex, FnvHashSet<BankLocation>>,
}

impl ConsumedBankLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the bank was not yet consumed.
    pub fn add(&mut self, map: MapIndex, bank: BankLocation) -> bool {
        self.banks.entry(map).or_default().insert(bank)
    }

    pub fn contains(&self, map: MapIndex, bank: BankLocation) -> bool {
        self.banks
            .get(&map)
            .map(|banks| banks.contains(&bank))
            .unwrap_or(false)
    }

    /// Consumed banks of `map` inside `range`.
    pub fn visible_subset(&self, map: MapIndex, range: &BankRange) -> FnvHashSet<BankLocation> {
        self.banks
            .get(&map)
            .map(|banks| banks.iter().copied().filter(|b| range.contains(*b)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, map: MapIndex) -> usize {
        self.banks.get(&map).map(|banks| banks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.banks.values().all(|banks| banks.is_empty())
    }

    pub fn total(&self) -> usize {
        self.banks.values().map(|banks| banks.len()).sum()
    }
}
