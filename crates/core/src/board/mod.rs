//! Top-down board of the collection: layout, hit-testing, drag and raster.

pub mod drag;
pub mod geometry;
pub mod positions;
pub mod raster;
pub mod scene;

pub use drag::{DragController, DragState};
pub use geometry::{BoardGeometry, Point, Rect};
pub use positions::PositionMap;
pub use scene::{Marker, Scene};

use crate::error::CoreError;
use crate::pothole::{Pothole, StoredPothole};

/// One finished render: the laid-out scene and its PNG encoding.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub scene: Scene,
    pub png: Vec<u8>,
}

/// Board view state owned by the UI root: positions plus the drag gesture.
///
/// The board never holds measurements; callers pass the current records on
/// every call so the authority's last answer is always what gets drawn.
#[derive(Debug, Clone, Default)]
pub struct Board {
    geometry: BoardGeometry,
    positions: PositionMap,
    drag: DragController,
}

impl Board {
    pub fn new(geometry: BoardGeometry) -> Self {
        Self {
            geometry,
            positions: PositionMap::new(),
            drag: DragController::new(),
        }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// Lay out the records, assigning default positions where missing.
    pub fn layout(&mut self, potholes: &[Pothole]) -> Scene {
        self.positions.truncate(potholes.len());
        Scene::build(potholes, &mut self.positions, &self.geometry)
    }

    /// Lay out and rasterize.
    pub fn render(&mut self, potholes: &[Pothole]) -> Result<Rendered, CoreError> {
        let scene = self.layout(potholes);
        let png = raster::render_png(&scene)?;
        Ok(Rendered { scene, png })
    }

    pub fn pointer_down(&mut self, potholes: &[Pothole], at: Point) -> Option<usize> {
        let scene = self.layout(potholes);
        self.drag.pointer_down(&scene, at)
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<(usize, Point)> {
        self.drag.pointer_move(&mut self.positions, at)
    }

    pub fn pointer_up(&mut self) {
        self.drag.pointer_up();
    }

    // -- collection bookkeeping --------------------------------------------

    /// The collection was re-echoed without renumbering (append, update).
    pub fn collection_changed(&mut self) {
        self.drag.cancel();
    }

    /// A record was inserted at `index`.
    pub fn record_inserted(&mut self, index: usize) {
        self.drag.cancel();
        self.positions.record_inserted(index);
    }

    /// The record at `index` was removed.
    pub fn record_removed(&mut self, index: usize) {
        self.drag.cancel();
        self.positions.record_removed(index);
    }

    /// The collection was replaced by persisted records (load/import).
    pub fn replace_positions(&mut self, records: &[StoredPothole]) {
        self.drag.cancel();
        self.positions = PositionMap::from_records(records);
    }

    /// The collection was emptied.
    pub fn clear(&mut self) {
        self.drag.cancel();
        self.positions.clear();
    }

    /// Records joined with their current positions, for saving.
    pub fn stored(&self, potholes: &[Pothole]) -> Vec<StoredPothole> {
        potholes
            .iter()
            .enumerate()
            .map(|(i, p)| StoredPothole::from_parts(*p, self.positions.get(i)))
            .collect()
    }
}
