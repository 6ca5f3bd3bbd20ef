//! Pointer-driven repositioning of board markers.

use super::geometry::Point;
use super::positions::PositionMap;
use super::scene::Scene;

/// Drag gesture state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        index: usize,
        /// Pointer position relative to the marker origin at grab time.
        grab: Point,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start dragging the first marker under `at`. Returns the grabbed index.
    ///
    /// A press that misses every marker leaves the controller idle.
    pub fn pointer_down(&mut self, scene: &Scene, at: Point) -> Option<usize> {
        let marker = scene.hit_test(at)?;
        self.state = DragState::Dragging {
            index: marker.index,
            grab: at.offset_from(marker.rect.origin()),
        };
        Some(marker.index)
    }

    /// Move the grabbed marker so the grab point stays under the pointer.
    ///
    /// Returns the moved index and its new origin; `None` while idle.
    pub fn pointer_move(&mut self, positions: &mut PositionMap, at: Point) -> Option<(usize, Point)> {
        let DragState::Dragging { index, grab } = self.state else {
            return None;
        };
        let origin = at.offset_from(grab);
        positions.set(index, origin);
        Some((index, origin))
    }

    /// End the gesture wherever the pointer is.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Abandon the gesture without a pointer event.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
