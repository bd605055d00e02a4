//! Value types shared across the controller.

use serde::{Deserialize, Serialize};

/// A 2D point in meters, in the robot body frame (+x forward, +y left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in meters
    pub x: f64,
    /// Y coordinate in meters
    pub y: f64,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Rigid 2D transform: position in meters, heading in radians.
///
/// Heading is normalized to [-π, π] on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Heading in radians
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose with theta normalized to [-π, π].
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: crate::core::math::normalize_angle(theta),
        }
    }

    /// Identity pose at the origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Transform a point from this pose's local frame to the parent frame.
    #[inline]
    pub fn transform_point(&self, point: &Point2D) -> Point2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Point2D::new(
            self.x + point.x * cos_t - point.y * sin_t,
            self.y + point.x * sin_t + point.y * cos_t,
        )
    }

    /// Transform a point from the parent frame into this pose's local frame.
    ///
    /// Equivalent to applying the inverse of the homogeneous transform built
    /// from `(x, y, theta)`.
    #[inline]
    pub fn inverse_transform_point(&self, point: &Point2D) -> Point2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        Point2D::new(dx * cos_t + dy * sin_t, -dx * sin_t + dy * cos_t)
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// Motion command for one control interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Commanded forward speed in m/s, never negative
    pub velocity: f64,
    /// Commanded curvature in 1/m, positive for left turns
    pub curvature: f64,
}

impl Command {
    /// Create a new command.
    #[inline]
    pub fn new(velocity: f64, curvature: f64) -> Self {
        Self {
            velocity,
            curvature,
        }
    }
}

/// A command plus the monotonic instant it was issued.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandStamped {
    pub command: Command,
    /// Seconds on the issuing clock (see [`crate::MonotonicClock`])
    pub stamp: f64,
}

impl CommandStamped {
    /// Create a new stamped command.
    #[inline]
    pub fn new(command: Command, stamp: f64) -> Self {
        Self { command, stamp }
    }
}

/// Predicted vehicle state, expressed in the body frame of the last
/// observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State2D {
    pub pose: Pose2D,
    /// Forward speed in m/s
    pub speed: f64,
}

impl State2D {
    /// Seed state before any in-flight command is replayed.
    #[inline]
    pub fn seed(speed: f64) -> Self {
        Self {
            pose: Pose2D::identity(),
            speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_point_finiteness() {
        assert!(Point2D::new(1.0, -2.0).is_finite());
        assert!(!Point2D::new(f64::NAN, 0.0).is_finite());
        assert!(!Point2D::new(0.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_transform_point_roundtrip() {
        let pose = Pose2D::new(1.5, -0.5, 0.8);
        let point = Point2D::new(2.0, 1.0);

        let global = pose.transform_point(&point);
        let back = pose.inverse_transform_point(&global);

        assert_relative_eq!(back.x, point.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, point.y, epsilon = 1e-12);
    }

    #[test]
    fn test_inverse_transform_point() {
        // Robot moved 1m forward and turned 90° left; a point that was at
        // (1, 1) in the old frame now sits 1m to the right.
        let pose = Pose2D::new(1.0, 0.0, FRAC_PI_2);
        let local = pose.inverse_transform_point(&Point2D::new(1.0, 1.0));
        assert_relative_eq!(local.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(local.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_seed_state_is_identity() {
        let state = State2D::seed(0.4);
        assert_eq!(state.pose, Pose2D::identity());
        assert_relative_eq!(state.speed, 0.4);
    }
}
