//! Pothole measurement records and dimension validation.
//!
//! A [`Pothole`] carries only what was measured (width and length in meters)
//! plus the area derived by the authority. Display positions are view state
//! and live on the board; [`StoredPothole`] is the persisted/wire shape that
//! can carry a position alongside the measurement.

use serde::{Deserialize, Serialize};

use crate::board::Point;
use crate::error::CoreError;

/// Validated width/length pair, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
}

impl Dimensions {
    /// Build a dimension pair, rejecting non-finite or non-positive values.
    pub fn new(width: f64, length: f64) -> Result<Self, CoreError> {
        validate_dimension("width", width)?;
        validate_dimension("length", length)?;
        Ok(Self { width, length })
    }

    /// Parse both dimensions from user-entered text.
    pub fn parse(width: &str, length: &str) -> Result<Self, CoreError> {
        Self::new(parse_meters("width", width)?, parse_meters("length", length)?)
    }

    /// Surface area in square meters.
    pub fn area(&self) -> f64 {
        self.width * self.length
    }
}

/// Validate a single dimension: finite and strictly positive.
pub fn validate_dimension(name: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number"
        )));
    }
    if value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be greater than zero, got {value}"
        )));
    }
    Ok(())
}

fn parse_meters(name: &str, raw: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoreError::Validation(format!("{name} must be a number, got '{raw}'")))
}

/// A measured pothole as echoed by the authority.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pothole {
    pub width: f64,
    pub length: f64,
    pub area: f64,
}

impl Pothole {
    /// Create a record from validated dimensions, deriving the area.
    pub fn measured(dimensions: Dimensions) -> Self {
        Self {
            width: dimensions.width,
            length: dimensions.length,
            area: dimensions.area(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            length: self.length,
        }
    }
}

/// Persisted record shape: the measurement plus an optional board position.
///
/// Saved files, the authority's in-memory list and load/import responses all
/// use this shape; `x`/`y` are omitted from JSON when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredPothole {
    pub width: f64,
    pub length: f64,
    pub area: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl StoredPothole {
    pub fn from_parts(pothole: Pothole, position: Option<Point>) -> Self {
        Self {
            width: pothole.width,
            length: pothole.length,
            area: pothole.area,
            x: position.map(|p| p.x),
            y: position.map(|p| p.y),
        }
    }

    pub fn pothole(&self) -> Pothole {
        Pothole {
            width: self.width,
            length: self.length,
            area: self.area,
        }
    }

    /// Position, only when both coordinates are present.
    pub fn position(&self) -> Option<Point> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

impl From<Pothole> for StoredPothole {
    fn from(pothole: Pothole) -> Self {
        Self::from_parts(pothole, None)
    }
}
