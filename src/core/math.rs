//! Mathematical primitives for constant-curvature kinematics.
//!
//! Angle normalization plus the instantaneous-center-of-rotation (ICR)
//! transforms the arc evaluator and the latency compensator share. For a
//! left turn of radius `R` the ICR sits at `(0, R)` in the body frame;
//! right turns reuse the same geometry with obstacle y-coordinates
//! reflected, which keeps every radius positive.

use std::f64::consts::PI;

use crate::core::types::{Point2D, Pose2D};

/// Curvatures with magnitude below this are treated as straight-line motion.
pub const STRAIGHT_CURVATURE_EPS: f64 = 0.01;

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use sarathi_nav::core::math::normalize_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-9);
/// assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-9);
/// ```
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Whether a curvature falls inside the degenerate straight-line band.
#[inline]
pub fn is_straight(curvature: f64) -> bool {
    curvature.abs() < STRAIGHT_CURVATURE_EPS
}

/// Turning radius for a curvature, always positive.
#[inline]
pub fn arc_radius(curvature: f64) -> f64 {
    1.0 / curvature.abs()
}

/// Pose reached after advancing by arc angle `phi` on a left-turn circle of
/// radius `radius` centered at `(0, radius)`.
#[inline]
pub fn icr_advance(radius: f64, phi: f64) -> Pose2D {
    Pose2D::new(radius * phi.sin(), radius - radius * phi.cos(), phi)
}

/// Map a body-frame point into the body frame the vehicle occupies after
/// advancing by arc angle `phi` on a circle of radius `radius`.
#[inline]
pub fn icr_transform(point: Point2D, phi: f64, radius: f64) -> Point2D {
    icr_advance(radius, phi).inverse_transform_point(&point)
}
