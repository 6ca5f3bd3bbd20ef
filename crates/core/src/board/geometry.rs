//! Board surface geometry: points, rectangles and placement rules.

use serde::{Deserialize, Serialize};

use crate::pothole::Pothole;

// ---------------------------------------------------------------------------
// Surface defaults
// ---------------------------------------------------------------------------

/// Fixed surface width in pixels.
pub const SURFACE_WIDTH: f64 = 800.0;

/// Vertical spacing between default-placed records, in pixels.
pub const ROW_HEIGHT: f64 = 50.0;

/// Surface height when there are few records, in pixels.
pub const MIN_SURFACE_HEIGHT: f64 = 800.0;

/// Rendering scale: pixels per measured meter.
pub const PIXELS_PER_METER: f64 = 10.0;

/// A position in surface pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to `self`.
    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment on every edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Surface sizing and scale used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub width: f64,
    pub row_height: f64,
    pub min_height: f64,
    pub pixels_per_meter: f64,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            row_height: ROW_HEIGHT,
            min_height: MIN_SURFACE_HEIGHT,
            pixels_per_meter: PIXELS_PER_METER,
        }
    }
}

impl BoardGeometry {
    /// `max(count * row_height, min_height)`.
    pub fn surface_height(&self, count: usize) -> f64 {
        (count as f64 * self.row_height).max(self.min_height)
    }

    /// X coordinate of the road axis.
    pub fn axis_x(&self) -> f64 {
        self.width / 2.0
    }

    /// Default placement: centered on the axis, stacked one row per index.
    pub fn default_position(&self, index: usize, pothole: &Pothole) -> Point {
        Point::new(
            self.axis_x() - pothole.width * self.pixels_per_meter / 2.0,
            index as f64 * self.row_height,
        )
    }

    /// Rendered rectangle of a record placed at `position`.
    pub fn marker_rect(&self, position: Point, pothole: &Pothole) -> Rect {
        Rect {
            x: position.x,
            y: position.y,
            width: pothole.width * self.pixels_per_meter,
            height: pothole.length * self.pixels_per_meter,
        }
    }
}
