//! The seam between the client and whatever holds the authoritative
//! collection.
//!
//! [`AuthorityApi`](crate::api::AuthorityApi) talks HTTP; tests substitute
//! in-process implementations.

use async_trait::async_trait;
use pothole_core::pothole::{Dimensions, StoredPothole};
use pothole_core::wire::CollectionSnapshot;

use crate::api::AuthorityError;

/// A file returned by the authority (spreadsheet, report).
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file sent to the authority for import.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Remote operations on the authoritative collection.
///
/// Every mutation answers with the complete collection and summary.
#[async_trait]
pub trait Authority: Send + Sync {
    /// Append, or insert at the 0-based `index`.
    async fn add(&self, dimensions: Dimensions, index: Option<usize>) -> Result<CollectionSnapshot, AuthorityError>;

    async fn update(&self, index: usize, dimensions: Dimensions) -> Result<CollectionSnapshot, AuthorityError>;

    async fn remove(&self, index: usize) -> Result<CollectionSnapshot, AuthorityError>;

    async fn reset(&self) -> Result<CollectionSnapshot, AuthorityError>;

    async fn save(&self, name: &str, records: &[StoredPothole]) -> Result<(), AuthorityError>;

    async fn load(&self, name: &str) -> Result<CollectionSnapshot, AuthorityError>;

    async fn export(&self, name: &str, records: &[StoredPothole]) -> Result<Download, AuthorityError>;

    async fn import(&self, upload: Upload) -> Result<CollectionSnapshot, AuthorityError>;

    /// Store the rendered board, a `data:image/png;base64,` URL.
    async fn store_image(&self, data_url: String) -> Result<(), AuthorityError>;

    async fn report(&self, name: &str) -> Result<Download, AuthorityError>;
}
