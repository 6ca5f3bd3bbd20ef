//! The UI root: owns the store and the board and keeps them in step.
//!
//! Every successful data operation re-lays out the board and uploads the
//! rendered image in a detached task. Drag gestures touch only board
//! positions and never reach the authority.

use std::sync::Arc;

use pothole_core::board::{Board, BoardGeometry, DragState, Point, Rendered, Scene};
use pothole_core::error::CoreError;
use pothole_core::pothole::{Pothole, StoredPothole};
use pothole_core::summary::Summary;
use pothole_core::wire::png_data_url;
use tokio::task::JoinHandle;

use crate::authority::{Authority, Download, Upload};
use crate::store::{CollectionStore, StoreError};

pub struct Session<A> {
    store: CollectionStore<A>,
    board: Board,
    scene: Option<Scene>,
    last_upload: Option<JoinHandle<()>>,
}

impl<A: Authority + 'static> Session<A> {
    pub fn new(authority: Arc<A>) -> Self {
        Self::with_geometry(authority, BoardGeometry::default())
    }

    pub fn with_geometry(authority: Arc<A>, geometry: BoardGeometry) -> Self {
        Self {
            store: CollectionStore::new(authority),
            board: Board::new(geometry),
            scene: None,
            last_upload: None,
        }
    }

    pub fn potholes(&self) -> &[Pothole] {
        self.store.potholes()
    }

    pub fn summary(&self) -> Summary {
        self.store.summary()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Scene of the most recent render.
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn drag_state(&self) -> DragState {
        self.board.drag_state()
    }

    /// Records joined with their board positions.
    pub fn stored(&self) -> Vec<StoredPothole> {
        self.board.stored(self.store.potholes())
    }

    // -- store operations ---------------------------------------------------

    pub async fn add(&mut self, width: f64, length: f64) -> Result<(), StoreError> {
        self.store.add(width, length).await?;
        self.board.collection_changed();
        self.redraw();
        Ok(())
    }

    /// Insert at a 1-based position.
    pub async fn insert_at(&mut self, position: usize, width: f64, length: f64) -> Result<(), StoreError> {
        let index = self.store.insert_at(position, width, length).await?;
        self.board.record_inserted(index);
        self.redraw();
        Ok(())
    }

    pub async fn update(&mut self, index: usize, width: f64, length: f64) -> Result<(), StoreError> {
        self.store.update(index, width, length).await?;
        self.board.collection_changed();
        self.redraw();
        Ok(())
    }

    pub async fn remove(&mut self, index: usize) -> Result<(), StoreError> {
        self.store.remove(index).await?;
        self.board.record_removed(index);
        self.redraw();
        Ok(())
    }

    pub async fn reset(&mut self) -> Result<(), StoreError> {
        self.store.reset().await?;
        self.board.clear();
        self.redraw();
        Ok(())
    }

    pub async fn save(&self, name: &str) -> Result<(), StoreError> {
        self.store.save(name, &self.stored()).await
    }

    pub async fn load(&mut self, name: &str) -> Result<(), StoreError> {
        let records = self.store.load(name).await?;
        self.board.replace_positions(&records);
        self.redraw();
        Ok(())
    }

    pub async fn export(&self, name: &str) -> Result<Download, StoreError> {
        self.store.export(name, &self.stored()).await
    }

    pub async fn import(&mut self, upload: Upload) -> Result<(), StoreError> {
        let records = self.store.import(upload).await?;
        self.board.replace_positions(&records);
        self.redraw();
        Ok(())
    }

    /// Render, store the image (awaited), then request the report.
    pub async fn generate_report(&mut self, name: &str) -> Result<Download, StoreError> {
        let rendered = self.render().map_err(|e| StoreError::Validation(e.to_string()))?;
        // An older background upload must not land after this one.
        self.wait_for_upload().await;
        self.store
            .authority()
            .store_image(png_data_url(&rendered.png))
            .await?;
        self.store.report(name).await
    }

    // -- board --------------------------------------------------------------

    /// Lay out and rasterize the current collection.
    pub fn render(&mut self) -> Result<Rendered, CoreError> {
        let rendered = self.board.render(self.store.potholes())?;
        self.scene = Some(rendered.scene.clone());
        Ok(rendered)
    }

    /// PNG bytes of the current board.
    pub fn snapshot_png(&mut self) -> Result<Vec<u8>, CoreError> {
        Ok(self.render()?.png)
    }

    /// Press at `at`; returns the grabbed 0-based index.
    pub fn pointer_down(&mut self, at: Point) -> Option<usize> {
        let grabbed = self.board.pointer_down(self.store.potholes(), at);
        tracing::debug!(x = at.x, y = at.y, grabbed = ?grabbed, "Pointer down");
        grabbed
    }

    /// Drag to `at`; redraws when a record moved.
    pub fn pointer_move(&mut self, at: Point) -> Option<usize> {
        let (index, origin) = self.board.pointer_move(at)?;
        tracing::debug!(index, x = origin.x, y = origin.y, "Pothole dragged");
        self.redraw();
        Some(index)
    }

    pub fn pointer_up(&mut self) {
        self.board.pointer_up();
    }

    /// Wait for the most recent background image upload, if any.
    pub async fn wait_for_upload(&mut self) {
        if let Some(handle) = self.last_upload.take() {
            // The task logs its own failure.
            let _ = handle.await;
        }
    }

    fn redraw(&mut self) {
        match self.render() {
            Ok(rendered) => self.upload_in_background(rendered.png),
            Err(e) => tracing::error!(error = %e, "Board render failed"),
        }
    }

    fn upload_in_background(&mut self, png: Vec<u8>) {
        let authority = Arc::clone(self.store.authority());
        let handle = tokio::spawn(async move {
            if let Err(e) = authority.store_image(png_data_url(&png)).await {
                tracing::warn!(error = %e, "Board image upload failed");
            }
        });
        self.last_upload = Some(handle);
    }
}
