//! Collection Store: the client's copy of the authoritative collection.
//!
//! Every operation validates locally, submits to the authority and then
//! replaces the local records and summary with the echoed snapshot. A
//! failure at any step leaves the store exactly as it was.

use std::sync::Arc;

use pothole_core::collection::{ensure_index, insert_position_to_index};
use pothole_core::error::CoreError;
use pothole_core::naming::validate_collection_name;
use pothole_core::pothole::{Dimensions, Pothole, StoredPothole};
use pothole_core::summary::Summary;
use pothole_core::wire::CollectionSnapshot;

use crate::api::AuthorityError;
use crate::authority::{Authority, Download, Upload};

/// Why a store operation failed. The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The request did not complete.
    #[error("{0}")]
    Transport(String),

    /// The authority answered with a failure message.
    #[error("{0}")]
    Rejected(String),
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

impl From<AuthorityError> for StoreError {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::Rejected { message, .. } => StoreError::Rejected(message),
            other => StoreError::Transport(other.to_string()),
        }
    }
}

pub struct CollectionStore<A> {
    authority: Arc<A>,
    potholes: Vec<Pothole>,
    summary: Summary,
}

impl<A: Authority> CollectionStore<A> {
    pub fn new(authority: Arc<A>) -> Self {
        Self {
            authority,
            potholes: Vec::new(),
            summary: Summary::default(),
        }
    }

    pub fn authority(&self) -> &Arc<A> {
        &self.authority
    }

    /// Records as last echoed by the authority.
    pub fn potholes(&self) -> &[Pothole] {
        &self.potholes
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn len(&self) -> usize {
        self.potholes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.potholes.is_empty()
    }

    /// Overwrite local state with an echo; returns the records as sent.
    fn apply(&mut self, snapshot: CollectionSnapshot) -> Vec<StoredPothole> {
        self.potholes = snapshot.potholes.iter().map(StoredPothole::pothole).collect();
        self.summary = snapshot.summary;
        snapshot.potholes
    }

    /// Append a record.
    pub async fn add(&mut self, width: f64, length: f64) -> Result<(), StoreError> {
        let dimensions = Dimensions::new(width, length)?;
        let snapshot = self.authority.add(dimensions, None).await?;
        self.apply(snapshot);
        tracing::debug!(width, length, count = self.len(), "Pothole added");
        Ok(())
    }

    /// Insert at a 1-based `position` (`1..=len + 1`). Returns the 0-based
    /// index the record now occupies.
    pub async fn insert_at(&mut self, position: usize, width: f64, length: f64) -> Result<usize, StoreError> {
        let index = insert_position_to_index(position, self.len())?;
        let dimensions = Dimensions::new(width, length)?;
        let snapshot = self.authority.add(dimensions, Some(index)).await?;
        self.apply(snapshot);
        tracing::debug!(index, width, length, count = self.len(), "Pothole inserted");
        Ok(index)
    }

    /// Replace the measurement at the 0-based `index`.
    pub async fn update(&mut self, index: usize, width: f64, length: f64) -> Result<(), StoreError> {
        ensure_index(index, self.len())?;
        let dimensions = Dimensions::new(width, length)?;
        let snapshot = self.authority.update(index, dimensions).await?;
        self.apply(snapshot);
        tracing::debug!(index, width, length, "Pothole updated");
        Ok(())
    }

    /// Remove the record at the 0-based `index`.
    pub async fn remove(&mut self, index: usize) -> Result<(), StoreError> {
        ensure_index(index, self.len())?;
        let snapshot = self.authority.remove(index).await?;
        self.apply(snapshot);
        tracing::debug!(index, count = self.len(), "Pothole removed");
        Ok(())
    }

    pub async fn reset(&mut self) -> Result<(), StoreError> {
        let snapshot = self.authority.reset().await?;
        self.apply(snapshot);
        tracing::debug!("Collection reset");
        Ok(())
    }

    /// Save `records` (the current collection joined with board positions).
    pub async fn save(&self, name: &str, records: &[StoredPothole]) -> Result<(), StoreError> {
        let name = validate_collection_name(name)?;
        self.authority.save(name, records).await?;
        tracing::info!(name, count = records.len(), "Collection saved");
        Ok(())
    }

    /// Replace the collection with a saved one. Returns the loaded records
    /// including any persisted positions.
    pub async fn load(&mut self, name: &str) -> Result<Vec<StoredPothole>, StoreError> {
        let name = validate_collection_name(name)?;
        let snapshot = self.authority.load(name).await?;
        let records = self.apply(snapshot);
        tracing::info!(name, count = records.len(), "Collection loaded");
        Ok(records)
    }

    pub async fn export(&self, name: &str, records: &[StoredPothole]) -> Result<Download, StoreError> {
        let name = validate_collection_name(name)?;
        let download = self.authority.export(name, records).await?;
        tracing::info!(name, file = %download.filename, bytes = download.bytes.len(), "Spreadsheet exported");
        Ok(download)
    }

    /// Replace the collection with the contents of an uploaded file.
    pub async fn import(&mut self, upload: Upload) -> Result<Vec<StoredPothole>, StoreError> {
        if upload.bytes.is_empty() {
            return Err(StoreError::Validation(format!(
                "file '{}' is empty",
                upload.filename
            )));
        }
        let filename = upload.filename.clone();
        let snapshot = self.authority.import(upload).await?;
        let records = self.apply(snapshot);
        tracing::info!(file = %filename, count = records.len(), "Spreadsheet imported");
        Ok(records)
    }

    /// Request the PDF report. The board image must already be stored.
    pub async fn report(&self, name: &str) -> Result<Download, StoreError> {
        let name = validate_collection_name(name)?;
        let download = self.authority.report(name).await?;
        tracing::info!(name, bytes = download.bytes.len(), "Report generated");
        Ok(download)
    }
}
