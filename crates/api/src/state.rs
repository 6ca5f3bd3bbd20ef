use std::sync::Arc;

use pothole_core::collection::Collection;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::storage::FileStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The one authoritative collection.
    pub collection: Arc<RwLock<Collection>>,
    /// Saved collections and the board image under `DATA_DIR`.
    pub files: Arc<FileStore>,
    /// Server configuration (report fonts, timeouts).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Fresh state with an empty collection.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            collection: Arc::new(RwLock::new(Collection::new())),
            files: Arc::new(FileStore::new(config.data_dir.clone())),
            config: Arc::new(config),
        }
    }
}
