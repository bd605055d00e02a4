//! Free path length and lateral clearance along constant-curvature arcs.
//!
//! Every obstacle point is described relative to the instantaneous center
//! of rotation at `(0, R)`: its distance `r = √(x² + (R - y)²)` from the
//! ICR and its arc angle `θ = atan2(x, R - y)`. The margin-inflated
//! rectangular footprint sweeps an annulus around the ICR; which band of
//! that annulus a point's radius falls into decides which part of the body
//! it would strike. Right turns reflect obstacle y-coordinates and reuse
//! the left-turn analysis.

use crate::control::ControllerParams;
use crate::core::math::{self, is_straight};
use crate::core::types::Point2D;
use crate::vehicle::Car;

/// Swept radii of the margin-inflated footprint about the ICR.
#[derive(Debug, Clone, Copy)]
struct SweptAnnulus {
    /// Innermost body point: the inner end of the rear axle.
    inner_rear: f64,
    /// Inner front corner.
    inner_front: f64,
    /// Outer front corner.
    outer_front: f64,
    /// Outer rear corner.
    outer_rear: f64,
    /// Outer end of the rear axle.
    outer_rear_axle: f64,
}

impl SweptAnnulus {
    fn new(car: &Car, margin: f64, radius: f64) -> Self {
        let half_width = car.dimensions.half_width() + margin;
        let front = car.dimensions.front_extent() + margin;
        let rear = car.dimensions.rear_extent() + margin;
        let inner_rear = radius - half_width;
        let outer_rear_axle = radius + half_width;
        Self {
            inner_rear,
            inner_front: (inner_rear * inner_rear + front * front).sqrt(),
            outer_front: (outer_rear_axle * outer_rear_axle + front * front).sqrt(),
            outer_rear: (outer_rear_axle * outer_rear_axle + rear * rear).sqrt(),
            outer_rear_axle,
        }
    }

    /// Radius beyond which no part of the body ever reaches.
    #[inline]
    fn outermost(&self) -> f64 {
        self.outer_front.max(self.outer_rear)
    }
}

/// Longest distance the vehicle can travel along the arc of `curvature`
/// before its inflated footprint first contacts a cloud point.
///
/// Starts from the sensing-horizon bound and only shrinks; with nothing in
/// the way the horizon value itself comes back. A negative result means the
/// footprint already overlaps an obstacle.
pub(crate) fn free_path_length(
    car: &Car,
    params: &ControllerParams,
    cloud: &[Point2D],
    curvature: f64,
) -> f64 {
    let front = params.margin + car.dimensions.front_extent();
    let mut free = params.horizon - front;

    if is_straight(curvature) {
        let lane = car.dimensions.half_width() + params.margin;
        for point in cloud {
            // Only points ahead of the car and inside the swept lane count.
            if point.y.abs() < lane && point.x > 0.0 {
                let candidate = point.x - front;
                if candidate < free {
                    free = candidate;
                }
            }
        }
        return free;
    }

    let radius = math::arc_radius(curvature);
    let annulus = SweptAnnulus::new(car, params.margin, radius);
    let rear = params.margin + car.dimensions.rear_extent();
    let lane = car.dimensions.half_width() + params.margin;

    for point in cloud {
        let y = if curvature < 0.0 { -point.y } else { point.y };
        let r = point.x.hypot(radius - y);
        let theta = point.x.atan2(radius - y);

        // Outside the swept annulus entirely: never an obstacle.
        if r < annulus.inner_rear || r > annulus.outermost() {
            continue;
        }

        if r < annulus.inner_front && theta > 0.0 {
            // Strikes the inner side of the body.
            let psi = (annulus.inner_rear / r).acos();
            let candidate = radius * (theta - psi);
            if candidate < free {
                free = candidate;
            }
        } else if r < annulus.outer_front && theta > 0.0 {
            // Strikes the front bumper.
            let psi = (front / r).asin();
            let candidate = radius * (theta - psi);
            if candidate < free {
                free = candidate;
            }
        }

        // The outer rear corner swings outward into points sitting beside
        // and behind the body. Tracked for diagnostics only; it does not
        // bound the drivable distance.
        if r >= annulus.outer_rear_axle
            && r < annulus.outer_rear
            && point.x.abs() < rear
            && y.abs() > lane
        {
            let psi = -(annulus.outer_rear_axle / r).acos();
            log::trace!(
                "rear-corner sweep candidate {:.3} m at curvature {:.3}",
                radius * (theta - psi),
                curvature
            );
        }
    }
    free
}

/// Smallest lateral clearance of the swept footprint over the free path,
/// clamped to `[0, max_clearance]`.
pub(crate) fn clearance(
    car: &Car,
    params: &ControllerParams,
    cloud: &[Point2D],
    curvature: f64,
    free_path_length: f64,
) -> f64 {
    let lane = car.dimensions.half_width() + params.margin;
    let mut min_clearance = params.max_clearance;

    if is_straight(curvature) {
        for point in cloud {
            let side = point.y.abs();
            if lane <= side
                && side <= params.max_clearance
                && 0.0 <= point.x
                && point.x <= free_path_length + car.dimensions.wheelbase
            {
                let clearance = side - car.dimensions.wheelbase / 2.0 - params.margin;
                if clearance < min_clearance {
                    min_clearance = clearance;
                }
            }
        }
        return min_clearance.max(0.0);
    }

    let radius = math::arc_radius(curvature);
    let phi = free_path_length / radius;
    let band_inner = radius - lane - params.max_clearance;
    let band_outer = radius + lane + params.max_clearance;

    for point in cloud {
        let y = if curvature < 0.0 { -point.y } else { point.y };
        let r = point.x.hypot(radius - y);
        let theta = point.x.atan2(radius - y);

        // Points swept past while traversing the arc.
        if 0.0 <= theta && theta <= phi && band_inner <= r && r <= band_outer {
            let offset = if params.exact_arc_clearance {
                (r - radius).abs()
            } else {
                (r * theta.cos() - radius).abs()
            };
            let clearance = offset - lane;
            if clearance < min_clearance {
                min_clearance = clearance;
            }
        }

        // Points beside the body once it reaches the end of the free path.
        let local = math::icr_transform(Point2D::new(point.x, y), phi, radius);
        let side = local.y.abs();
        if lane <= side
            && side <= params.max_clearance
            && 0.0 <= local.x
            && local.x <= car.dimensions.wheelbase / 2.0
        {
            let clearance = side - lane;
            if clearance < min_clearance {
                min_clearance = clearance;
            }
        }
    }
    min_clearance.clamp(0.0, params.max_clearance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn car() -> Car {
        Car::default()
    }

    fn params() -> ControllerParams {
        ControllerParams::default()
    }

    // With the default car and margin: lane half-width 0.19, front extent
    // with margin 0.46, horizon-bounded free path 9.54.

    // ========================================================================
    // Straight-line free path
    // ========================================================================

    #[test]
    fn test_straight_empty_cloud_returns_horizon_bound() {
        let fpl = free_path_length(&car(), &params(), &[], 0.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_point_ahead_shortens_path() {
        let cloud = vec![Point2D::new(1.0, 0.0)];
        let fpl = free_path_length(&car(), &params(), &cloud, 0.0);
        assert_relative_eq!(fpl, 0.54, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_point_beside_lane_is_ignored() {
        let cloud = vec![Point2D::new(1.0, 0.2)];
        let fpl = free_path_length(&car(), &params(), &cloud, 0.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_point_behind_is_ignored() {
        let cloud = vec![Point2D::new(-1.0, 0.0)];
        let fpl = free_path_length(&car(), &params(), &cloud, 0.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    #[test]
    fn test_straight_overlapping_point_goes_negative() {
        let cloud = vec![Point2D::new(0.15, 0.0)];
        let fpl = free_path_length(&car(), &params(), &cloud, 0.0);
        assert_relative_eq!(fpl, 0.15 - 0.46);
    }

    // ========================================================================
    // Arc free path
    // ========================================================================

    #[test]
    fn test_arc_point_outside_annulus_is_culled() {
        // r = √2 ≈ 1.414 exceeds the widest swept corner at R = 1.
        let cloud = vec![Point2D::new(1.0, 0.0)];
        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_point_inside_annulus_is_culled() {
        // r ≈ 0.707 is inside the inner rear radius 0.81 at R = 1.
        let cloud = vec![Point2D::new(0.5, 0.5)];
        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_icr_point_is_culled() {
        let cloud = vec![Point2D::new(0.0, 1.0)];
        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_inner_side_strike() {
        // Point placed at r = 0.87, θ = 1 rad: inside the inner band
        // (0.81, 0.9315) at R = 1, so it strikes the inner body side.
        let r = 0.87_f64;
        let theta = 1.0_f64;
        let cloud = vec![Point2D::new(r * theta.sin(), 1.0 - r * theta.cos())];

        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);

        let psi = (0.81_f64 / r).acos();
        assert_relative_eq!(fpl, theta - psi, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_front_strike() {
        // Point placed at r = 1.1, θ = 1 rad: inside the front band
        // (0.9315, 1.2758) at R = 1, so it strikes the front bumper.
        let r = 1.1_f64;
        let theta = 1.0_f64;
        let cloud = vec![Point2D::new(r * theta.sin(), 1.0 - r * theta.cos())];

        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);

        let psi = (0.46_f64 / r).asin();
        assert_relative_eq!(fpl, theta - psi, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_overlapping_point_goes_negative() {
        // A point just ahead of the bumper obstructs every curvature.
        let cloud = vec![Point2D::new(0.15, 0.0)];
        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);
        assert!(fpl < 0.0, "expected negative free path, got {fpl}");
    }

    #[test]
    fn test_arc_right_turn_mirrors_left_turn() {
        let left = vec![Point2D::new(0.87, 0.53)];
        let right = vec![Point2D::new(0.87, -0.53)];

        let fpl_left = free_path_length(&car(), &params(), &left, 1.0);
        let fpl_right = free_path_length(&car(), &params(), &right, -1.0);

        assert_relative_eq!(fpl_left, fpl_right, epsilon = 1e-12);
    }

    #[test]
    fn test_arc_behind_point_does_not_bound_path() {
        // Just behind the rear axle and outside the lane, at a radius the
        // outer rear corner sweeps through (1.19 ≤ r < 1.198 at R = 1).
        // The rear sweep is diagnostic only, so the free path stays at the
        // horizon bound.
        let cloud = vec![Point2D::new(-0.05, -0.194)];
        let fpl = free_path_length(&car(), &params(), &cloud, 1.0);
        assert_relative_eq!(fpl, 9.54, epsilon = 1e-9);
    }

    // ========================================================================
    // Clearance
    // ========================================================================

    #[test]
    fn test_clearance_empty_cloud_is_capped() {
        let c = clearance(&car(), &params(), &[], 0.0, 9.54);
        assert_relative_eq!(c, 0.5);
    }

    #[test]
    fn test_straight_clearance_side_point() {
        let cloud = vec![Point2D::new(1.0, 0.3)];
        let c = clearance(&car(), &params(), &cloud, 0.0, 9.54);
        // Side offset minus half wheelbase and margin.
        assert_relative_eq!(c, 0.3 - 0.16 - 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_straight_clearance_ignores_point_past_free_path() {
        let cloud = vec![Point2D::new(2.0, 0.3)];
        let c = clearance(&car(), &params(), &cloud, 0.0, 1.0);
        assert_relative_eq!(c, 0.5);
    }

    #[test]
    fn test_straight_clearance_ignores_point_beyond_cap() {
        let cloud = vec![Point2D::new(1.0, 0.6)];
        let c = clearance(&car(), &params(), &cloud, 0.0, 9.54);
        assert_relative_eq!(c, 0.5);
    }

    #[test]
    fn test_arc_clearance_formula_gate() {
        // The chord projection r·cosθ recovers the point's lateral offset
        // in the starting frame (0.1 here), while the exact radial offset
        // measures from the swept circle (0.345).
        let cloud = vec![Point2D::new(1.0, 0.1)];

        let legacy = clearance(&car(), &params(), &cloud, 1.0, 9.54);
        assert_relative_eq!(legacy, 0.0);

        let mut exact_params = params();
        exact_params.exact_arc_clearance = true;
        let exact = clearance(&car(), &exact_params, &cloud, 1.0, 9.54);
        let r = 1.0_f64.hypot(0.9);
        assert_relative_eq!(exact, (r - 1.0) - 0.19, epsilon = 1e-12);
    }

    #[test]
    fn test_arc_clearance_is_floored_at_zero() {
        // Lateral offset 0.15 sits inside the inflated half-width 0.19, so
        // the raw value would be negative.
        let cloud = vec![Point2D::new(0.6, 0.15)];
        let c = clearance(&car(), &params(), &cloud, 1.0, 9.54);
        assert_relative_eq!(c, 0.0);
    }
}
