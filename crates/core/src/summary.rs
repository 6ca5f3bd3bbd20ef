//! Bucketed area totals over a pothole collection.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Bucket boundaries (square meters)
// ---------------------------------------------------------------------------

/// Largest area still counted as a small pothole (inclusive).
pub const SMALL_MAX_AREA: f64 = 5.0;

/// Largest area still counted as a medium pothole (inclusive).
pub const MEDIUM_MAX_AREA: f64 = 25.0;

/// Size class of a single pothole, by area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaBucket {
    /// `area <= 5`
    Small,
    /// `5 < area <= 25`
    Medium,
    /// `area > 25`
    Large,
}

impl AreaBucket {
    pub fn classify(area: f64) -> Self {
        if area <= SMALL_MAX_AREA {
            Self::Small
        } else if area <= MEDIUM_MAX_AREA {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

/// Area totals per bucket plus the grand total, rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub small_area: f64,
    pub medium_area: f64,
    pub large_area: f64,
    pub total_area: f64,
}

impl Summary {
    /// Compute the summary over a sequence of areas.
    ///
    /// The total is the sum of the unrounded bucket totals, so the rounded
    /// buckets add up to the rounded total within 0.015.
    pub fn from_areas(areas: impl IntoIterator<Item = f64>) -> Self {
        let (mut small, mut medium, mut large) = (0.0, 0.0, 0.0);
        for area in areas {
            match AreaBucket::classify(area) {
                AreaBucket::Small => small += area,
                AreaBucket::Medium => medium += area,
                AreaBucket::Large => large += area,
            }
        }
        Self {
            small_area: round2(small),
            medium_area: round2(medium),
            large_area: round2(large),
            total_area: round2(small + medium + large),
        }
    }

    /// Human-readable multi-line rendering used by the console and reports.
    pub fn lines(&self) -> [String; 4] {
        [
            format!("Small potholes (<= 5 m²): {} m²", self.small_area),
            format!("Medium potholes (5-25 m²): {} m²", self.medium_area),
            format!("Large potholes (> 25 m²): {} m²", self.large_area),
            format!("Total area: {} m²", self.total_area),
        ]
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
