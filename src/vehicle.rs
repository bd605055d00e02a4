//! Vehicle geometry and actuation limits.
//!
//! Pure data. Every downstream component borrows a non-owning view of the
//! [`Car`] and the values never change during a run.

use serde::Deserialize;

use crate::error::{Result, SarathiError};

/// Physical footprint of the vehicle in meters.
///
/// The body frame origin is the center of the rear axle, which is also the
/// point the commanded curvature steers.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Dimensions {
    /// Body width in meters
    #[serde(default = "default_width")]
    pub width: f64,

    /// Body length in meters
    #[serde(default = "default_length")]
    pub length: f64,

    /// Distance between the axles in meters, at most `length`
    #[serde(default = "default_wheelbase")]
    pub wheelbase: f64,
}

impl Dimensions {
    /// Half the body width.
    #[inline]
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Distance from the rear axle to the front bumper.
    #[inline]
    pub fn front_extent(&self) -> f64 {
        (self.length + self.wheelbase) / 2.0
    }

    /// Distance from the rear axle to the rear bumper.
    #[inline]
    pub fn rear_extent(&self) -> f64 {
        (self.length - self.wheelbase) / 2.0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: default_width(),
            length: default_length(),
            wheelbase: default_wheelbase(),
        }
    }
}

/// Actuation limits, all strictly positive.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Limits {
    /// Maximum forward speed in m/s
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Maximum acceleration magnitude in m/s²
    #[serde(default = "default_max_acceleration")]
    pub max_acceleration: f64,

    /// Maximum curvature magnitude in 1/m
    #[serde(default = "default_max_curvature")]
    pub max_curvature: f64,
}

impl Limits {
    /// Distance needed to brake from `speed` to rest at maximum deceleration.
    #[inline]
    pub fn braking_distance(&self, speed: f64) -> f64 {
        speed * speed / (2.0 * self.max_acceleration)
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_speed: default_max_speed(),
            max_acceleration: default_max_acceleration(),
            max_curvature: default_max_curvature(),
        }
    }
}

/// Car description: footprint plus limits.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Car {
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub limits: Limits,
}

impl Car {
    /// Check the geometric and limit invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.dimensions.width > 0.0) {
            return Err(SarathiError::Vehicle("width must be positive"));
        }
        if !(self.dimensions.length > 0.0) {
            return Err(SarathiError::Vehicle("length must be positive"));
        }
        if !(self.dimensions.wheelbase > 0.0) {
            return Err(SarathiError::Vehicle("wheelbase must be positive"));
        }
        if self.dimensions.wheelbase > self.dimensions.length {
            return Err(SarathiError::Vehicle("wheelbase cannot exceed length"));
        }
        if !(self.limits.max_speed > 0.0) {
            return Err(SarathiError::Vehicle("max_speed must be positive"));
        }
        if !(self.limits.max_acceleration > 0.0) {
            return Err(SarathiError::Vehicle("max_acceleration must be positive"));
        }
        if !(self.limits.max_curvature > 0.0) {
            return Err(SarathiError::Vehicle("max_curvature must be positive"));
        }
        Ok(())
    }
}

// Default value functions (reference 1/10-scale car)
fn default_width() -> f64 {
    0.28
}
fn default_length() -> f64 {
    0.5
}
fn default_wheelbase() -> f64 {
    0.32
}
fn default_max_speed() -> f64 {
    1.0
}
fn default_max_acceleration() -> f64 {
    4.0
}
fn default_max_curvature() -> f64 {
    1.0
}
