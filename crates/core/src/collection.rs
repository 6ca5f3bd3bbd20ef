//! Ordered pothole collection and index rules.
//!
//! The authority owns one [`Collection`]; clients only ever see it through
//! echoed snapshots. Index helpers here are shared by both sides so the
//! client's local pre-checks and the authority's checks cannot drift.

use crate::error::CoreError;
use crate::pothole::{Dimensions, Pothole, StoredPothole};
use crate::summary::Summary;

/// Convert a 1-based insert position into a 0-based index.
///
/// Valid positions are `1..=len + 1`; `len + 1` appends.
pub fn insert_position_to_index(position: usize, len: usize) -> Result<usize, CoreError> {
    if position == 0 || position > len + 1 {
        return Err(CoreError::Validation(format!(
            "insert position must be between 1 and {}, got {position}",
            len + 1
        )));
    }
    Ok(position - 1)
}

/// Ensure `index` addresses an existing record.
pub fn ensure_index(index: usize, len: usize) -> Result<(), CoreError> {
    if index >= len {
        return Err(CoreError::NotFound {
            entity: "Pothole",
            index,
            len,
        });
    }
    Ok(())
}

/// Ordered sequence of records; order defines display index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    records: Vec<StoredPothole>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StoredPothole>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StoredPothole] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary::from_areas(self.records.iter().map(|r| r.area))
    }

    /// Append a new record at the end.
    pub fn append(&mut self, dimensions: Dimensions) {
        self.records.push(Pothole::measured(dimensions).into());
    }

    /// Insert a new record at a 0-based index; `index == len` appends.
    pub fn insert(&mut self, index: usize, dimensions: Dimensions) -> Result<(), CoreError> {
        if index > self.records.len() {
            return Err(CoreError::Validation(format!(
                "insert index must be between 0 and {}, got {index}",
                self.records.len()
            )));
        }
        self.records
            .insert(index, Pothole::measured(dimensions).into());
        Ok(())
    }

    /// Replace the measurement of an existing record; any stored position
    /// is kept.
    pub fn update(&mut self, index: usize, dimensions: Dimensions) -> Result<(), CoreError> {
        ensure_index(index, self.records.len())?;
        let record = &mut self.records[index];
        let measured = Pothole::measured(dimensions);
        record.width = measured.width;
        record.length = measured.length;
        record.area = measured.area;
        Ok(())
    }

    /// Remove the record at `index`; later records shift up by one.
    pub fn remove(&mut self, index: usize) -> Result<StoredPothole, CoreError> {
        ensure_index(index, self.records.len())?;
        Ok(self.records.remove(index))
    }

    /// Replace every record wholesale (load / import).
    pub fn replace(&mut self, records: Vec<StoredPothole>) {
        self.records = records;
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
