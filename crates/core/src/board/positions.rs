//! Display positions kept parallel to the collection, keyed by index.
//!
//! Measurements come from the authority; positions never do (except through
//! load/import of a saved file). The map follows index renumbering so a
//! record keeps its place on the board when unrelated records change.

use super::geometry::Point;
use crate::pothole::StoredPothole;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionMap {
    slots: Vec<Option<Point>>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed positions from persisted records; records without one get none.
    pub fn from_records(records: &[StoredPothole]) -> Self {
        Self {
            slots: records.iter().map(StoredPothole::position).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.slots.get(index).copied().flatten()
    }

    /// Set (or move) the position of `index`.
    pub fn set(&mut self, index: usize, point: Point) {
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(point);
    }

    /// Return the existing position, or assign `default` once and return it.
    pub fn get_or_assign(&mut self, index: usize, default: impl FnOnce() -> Point) -> Point {
        match self.get(index) {
            Some(point) => point,
            None => {
                let point = default();
                self.set(index, point);
                point
            }
        }
    }

    /// A record was inserted at `index`: later positions shift down by one.
    pub fn record_inserted(&mut self, index: usize) {
        if index <= self.slots.len() {
            self.slots.insert(index, None);
        }
    }

    /// The record at `index` was removed: later positions shift up by one.
    pub fn record_removed(&mut self, index: usize) {
        if index < self.slots.len() {
            self.slots.remove(index);
        }
    }

    /// Drop positions beyond `len` records.
    pub fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Positions for the first `len` records, for persisting alongside them.
    pub fn snapshot(&self, len: usize) -> Vec<Option<Point>> {
        (0..len).map(|i| self.get(i)).collect()
    }
}
