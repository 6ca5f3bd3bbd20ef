//! Scene description of one board render.
//!
//! Building a [`Scene`] performs default placement (writing new positions
//! into the [`PositionMap`]) and computes every rectangle, without touching
//! pixels. Hit-testing and rasterization both work from the scene.

use super::geometry::{BoardGeometry, Point, Rect};
use super::positions::PositionMap;
use crate::pothole::Pothole;

/// One drawn record.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// 0-based collection index.
    pub index: usize,
    /// 1-based label drawn at the center.
    pub label: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    /// X coordinate of the vertical road axis.
    pub axis_x: f64,
    /// Markers in collection order.
    pub markers: Vec<Marker>,
}

impl Scene {
    /// Lay out `potholes`, assigning default positions to unplaced records.
    pub fn build(potholes: &[Pothole], positions: &mut PositionMap, geometry: &BoardGeometry) -> Self {
        let markers = potholes
            .iter()
            .enumerate()
            .map(|(index, pothole)| {
                let origin =
                    positions.get_or_assign(index, || geometry.default_position(index, pothole));
                Marker {
                    index,
                    label: (index + 1).to_string(),
                    rect: geometry.marker_rect(origin, pothole),
                }
            })
            .collect();

        Self {
            width: geometry.width,
            height: geometry.surface_height(potholes.len()),
            axis_x: geometry.axis_x(),
            markers,
        }
    }

    /// First marker (in collection order) whose rectangle contains `point`.
    ///
    /// Later markers under the same point are unreachable while an earlier
    /// one overlaps them.
    pub fn hit_test(&self, point: Point) -> Option<&Marker> {
        self.markers.iter().find(|m| m.rect.contains(point))
    }
}
