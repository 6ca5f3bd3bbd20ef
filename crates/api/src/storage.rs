//! Files the authority keeps under its data directory.
//!
//! Saved collections live at `<data_dir>/<name>.json`; the last uploaded
//! board image at `<data_dir>/road_image.png`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use pothole_core::naming::validate_collection_name;
use pothole_core::pothole::StoredPothole;
use pothole_core::wire::decode_potholes;

use crate::error::{AppError, AppResult};

/// File name of the stored board image.
pub const BOARD_IMAGE_FILE: &str = "road_image.png";

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a saved collection; the name is validated first.
    pub fn collection_path(&self, name: &str) -> AppResult<PathBuf> {
        let name = validate_collection_name(name)?;
        Ok(self.root.join(format!("{name}.json")))
    }

    pub fn board_image_path(&self) -> PathBuf {
        self.root.join(BOARD_IMAGE_FILE)
    }

    /// Write `records` as the saved collection `name`.
    pub async fn save_collection(&self, name: &str, records: &[StoredPothole]) -> AppResult<PathBuf> {
        let path = self.collection_path(name)?;
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::InternalError(format!("Failed to encode collection: {e}")))?;
        self.write(&path, &json).await?;
        Ok(path)
    }

    /// Read the saved collection `name`.
    pub async fn load_collection(&self, name: &str) -> AppResult<Vec<StoredPothole>> {
        let path = self.collection_path(name)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "No saved collection named '{}'",
                    name.trim()
                )));
            }
            Err(e) => {
                return Err(AppError::InternalError(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        Ok(decode_potholes(&raw)?)
    }

    /// Replace the stored board image with already-encoded PNG bytes.
    pub async fn save_board_image(&self, png: &[u8]) -> AppResult<PathBuf> {
        let path = self.board_image_path();
        self.write(&path, png).await?;
        Ok(path)
    }

    pub async fn has_board_image(&self) -> bool {
        tokio::fs::try_exists(self.board_image_path())
            .await
            .unwrap_or(false)
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create data dir: {e}")))?;
        tokio::fs::write(path, bytes).await.map_err(|e| {
            AppError::InternalError(format!("Failed to write {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pothole_core::error::CoreError;

    fn record(width: f64, length: f64) -> StoredPothole {
        StoredPothole {
            width,
            length,
            area: width * length,
            x: Some(1.5),
            y: None,
        }
    }

    #[tokio::test]
    async fn saved_collection_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.save_collection("road", &[record(2.0, 3.0)]).await.unwrap();
        let loaded = store.load_collection(" road ").await.unwrap();

        assert_eq!(loaded, vec![record(2.0, 3.0)]);
    }

    #[tokio::test]
    async fn missing_collection_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_matches!(store.load_collection("nope").await, Err(AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_matches!(
            store.save_collection("../escape", &[]).await,
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[tokio::test]
    async fn board_image_presence_is_tracked() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(!store.has_board_image().await);
        store.save_board_image(b"png").await.unwrap();
        assert!(store.has_board_image().await);
    }
}
