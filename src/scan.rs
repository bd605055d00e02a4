//! Polar range scans and conversion to the controller's Cartesian cloud.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// A planar range scan in the sensor frame.
///
/// Angles grow counterclockwise from +x (forward); ranges are in meters.
/// Readings outside `[range_min, range_max]`, non-positive, or non-finite
/// are invalid and dropped on conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Angle of the first reading in radians
    pub angle_min: f64,
    /// Angular step between consecutive readings in radians
    pub angle_increment: f64,
    /// Minimum valid range in meters
    pub range_min: f64,
    /// Maximum valid range in meters
    pub range_max: f64,
    /// Range measurements in meters
    pub ranges: Vec<f64>,
}

impl LaserScan {
    /// Create a new scan.
    pub fn new(
        angle_min: f64,
        angle_increment: f64,
        range_min: f64,
        range_max: f64,
        ranges: Vec<f64>,
    ) -> Self {
        Self {
            angle_min,
            angle_increment,
            range_min,
            range_max,
            ranges,
        }
    }

    /// Number of readings.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the scan holds no readings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Angle of the reading at `index`.
    #[inline]
    pub fn angle_at(&self, index: usize) -> f64 {
        self.angle_min + index as f64 * self.angle_increment
    }

    /// Whether a range value is a usable measurement.
    #[inline]
    pub fn is_valid_range(&self, range: f64) -> bool {
        range.is_finite() && range > 0.0 && range >= self.range_min && range <= self.range_max
    }

    /// Iterate over `(angle, range)` pairs, valid or not.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ranges
            .iter()
            .enumerate()
            .map(move |(i, &range)| (self.angle_at(i), range))
    }

    /// Convert the valid readings into Cartesian body-frame points.
    pub fn to_point_cloud(&self) -> Vec<Point2D> {
        self.iter()
            .filter(|&(_, range)| self.is_valid_range(range))
            .map(|(angle, range)| {
                let (sin_a, cos_a) = angle.sin_cos();
                Point2D::new(range * cos_a, range * sin_a)
            })
            .collect()
    }
}
