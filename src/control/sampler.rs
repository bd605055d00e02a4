//! Curvature sampling, candidate scoring, and command generation.

use serde::{Deserialize, Serialize};

use crate::control::{arc, speed, ControllerParams, SpeedRegime};
use crate::core::math::is_straight;
use crate::core::types::{Command, Point2D};
use crate::vehicle::Car;

/// Forward goal the scoring steers toward, on the +x axis at the sensing
/// horizon.
const GOAL: Point2D = Point2D { x: 10.0, y: 0.0 };

/// Scoring weight on clearance.
const CLEARANCE_WEIGHT: f64 = 8.0;
/// Scoring weight on goal distance; negative so that closer scores higher.
const GOAL_WEIGHT: f64 = -0.5;
/// Below any reachable score, so the first sampled arc always replaces the
/// sentinel.
const SENTINEL_SCORE: f64 = -100.0;

/// One evaluated constant-curvature candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PathCandidate {
    /// Arc curvature in 1/m
    pub curvature: f64,
    /// Drivable distance along the arc in meters
    pub free_path_length: f64,
    /// Lateral clearance over the free path in meters
    pub clearance: f64,
    /// Distance from the projected pose to the goal in meters
    pub goal_distance: f64,
    /// Weighted selection score
    pub score: f64,
}

impl PathCandidate {
    fn sentinel() -> Self {
        Self {
            curvature: 0.0,
            free_path_length: 0.0,
            clearance: 0.0,
            goal_distance: 0.0,
            score: SENTINEL_SCORE,
        }
    }
}

/// Reactive time-optimal controller over constant-curvature primitives.
///
/// Borrows the vehicle description for its lifetime and holds no mutable
/// state: one call to [`generate_command`](Self::generate_command) per
/// control tick is a pure function of the cloud and the measured speed.
pub struct TimeOptimalController<'a> {
    car: &'a Car,
    params: ControllerParams,
}

impl<'a> TimeOptimalController<'a> {
    /// Create a controller for `car` with the given tuning.
    pub fn new(car: &'a Car, params: ControllerParams) -> Self {
        debug_assert!(params.validate().is_ok());
        Self { car, params }
    }

    /// Length of one control tick in seconds.
    #[inline]
    pub fn control_interval(&self) -> f64 {
        self.params.control_interval
    }

    /// The controller's tuning.
    pub fn params(&self) -> &ControllerParams {
        &self.params
    }

    /// Drivable distance along the arc of `curvature` before the inflated
    /// footprint contacts a cloud point. Negative when contact is already
    /// unavoidable.
    pub fn free_path_length(&self, cloud: &[Point2D], curvature: f64) -> f64 {
        arc::free_path_length(self.car, &self.params, cloud, curvature)
    }

    /// Smallest lateral clearance along the arc of `curvature`, clamped to
    /// `[0, max_clearance]`.
    pub fn clearance(&self, cloud: &[Point2D], curvature: f64, free_path_length: f64) -> f64 {
        arc::clearance(self.car, &self.params, cloud, curvature, free_path_length)
    }

    /// Distance to the goal from the pose one tick of full-speed travel
    /// along `curvature` reaches.
    pub fn goal_distance(&self, curvature: f64) -> f64 {
        let advance = self.car.limits.max_speed * self.params.control_interval;
        let projected = if is_straight(curvature) {
            Point2D::new(advance, 0.0)
        } else {
            // Signed radius: right turns project below the x axis.
            let radius = 1.0 / curvature;
            let phi = advance / radius;
            Point2D::new(radius * phi.sin(), radius - radius * phi.cos())
        };
        projected.distance(&GOAL)
    }

    /// Sweep the curvature range and keep the best-scoring candidate.
    ///
    /// Strict comparison against a sentinel makes the selection
    /// deterministic: on an exact tie the candidate sampled first, the one
    /// with the smaller curvature, stands.
    pub fn evaluate_paths(&self, cloud: &[Point2D]) -> PathCandidate {
        let mut best = PathCandidate::sentinel();
        let max_curvature = self.car.limits.max_curvature;

        let mut sample = -max_curvature;
        while sample <= max_curvature {
            // Accumulated stepping can overshoot the limit by an ulp.
            let curvature = sample.clamp(-max_curvature, max_curvature);

            let free_path_length = self.free_path_length(cloud, curvature);
            let clearance = self.clearance(cloud, curvature, free_path_length);
            let goal_distance = self.goal_distance(curvature);
            let score = free_path_length
                + CLEARANCE_WEIGHT * clearance
                + GOAL_WEIGHT * goal_distance;

            if score > best.score {
                best = PathCandidate {
                    curvature,
                    free_path_length,
                    clearance,
                    goal_distance,
                    score,
                };
            }
            sample += self.params.curvature_sampling_interval;
        }
        best
    }

    /// Produce the motion command for one tick.
    ///
    /// Never fails: rejected input degrades to a straight-line braking
    /// command, and an unavoidable collision degrades to deceleration with
    /// a warning.
    pub fn generate_command(&self, cloud: &[Point2D], current_speed: f64) -> Command {
        if let Some(braking) = self.reject_invalid(cloud, current_speed) {
            return braking;
        }

        let path = self.evaluate_paths(cloud);
        let (velocity, regime) = self.control_speed(current_speed, path.free_path_length);
        if regime == SpeedRegime::CollisionImminent {
            log::warn!(
                "free path length {:.3} m is below the stopping distance; braking",
                path.free_path_length
            );
        }
        log::debug!(
            "curvature {:.3} (fpl {:.3} m, clearance {:.3} m, score {:.3}); speed {:.3} -> {:.3} m/s",
            path.curvature,
            path.free_path_length,
            path.clearance,
            path.score,
            current_speed,
            velocity
        );
        Command::new(velocity, path.curvature)
    }

    /// Next commanded speed for a measured speed and free path length,
    /// together with the branch that produced it.
    pub fn control_speed(&self, current_speed: f64, free_path_length: f64) -> (f64, SpeedRegime) {
        speed::plan(
            &self.car.limits,
            self.params.control_interval,
            current_speed,
            free_path_length,
        )
    }

    /// Range checks on the tick inputs. Returns the safe braking command to
    /// emit when a check fails.
    fn reject_invalid(&self, cloud: &[Point2D], current_speed: f64) -> Option<Command> {
        if !current_speed.is_finite() || current_speed < 0.0 {
            log::warn!("rejecting speed reading {current_speed}; braking straight");
            let speed = if current_speed.is_finite() {
                current_speed.max(0.0)
            } else {
                0.0
            };
            return Some(self.braking_command(speed));
        }
        if let Some(point) = cloud.iter().find(|p| !p.is_finite()) {
            log::warn!(
                "rejecting cloud with non-finite point ({}, {}); braking straight",
                point.x,
                point.y
            );
            return Some(self.braking_command(current_speed));
        }
        None
    }

    fn braking_command(&self, speed: f64) -> Command {
        let step = self.car.limits.max_acceleration * self.params.control_interval;
        Command::new((speed - step).max(0.0), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn car() -> Car {
        Car::default()
    }

    fn controller(car: &Car) -> TimeOptimalController<'_> {
        TimeOptimalController::new(car, ControllerParams::default())
    }

    #[test]
    fn test_goal_distance_shrinks_toward_straight() {
        let car = car();
        let toc = controller(&car);

        let straight = toc.goal_distance(0.0);
        let gentle = toc.goal_distance(0.05);
        let tight = toc.goal_distance(1.0);

        assert_relative_eq!(straight, 9.95);
        assert!(straight < gentle, "{straight} vs {gentle}");
        assert!(gentle < tight, "{gentle} vs {tight}");
    }

    #[test]
    fn test_goal_distance_is_symmetric_in_curvature() {
        let car = car();
        let toc = controller(&car);
        assert_relative_eq!(toc.goal_distance(0.4), toc.goal_distance(-0.4));
    }

    #[test]
    fn test_empty_cloud_selects_straight() {
        let car = car();
        let toc = controller(&car);

        let best = toc.evaluate_paths(&[]);

        assert!(best.curvature.abs() < 1e-9, "curvature {}", best.curvature);
        assert_relative_eq!(best.free_path_length, 9.54, epsilon = 1e-9);
        assert_relative_eq!(best.clearance, 0.5);
    }

    #[test]
    fn test_candidate_curvature_stays_within_limits() {
        let car = car();
        let toc = controller(&car);

        // A wall ahead pushes the winner to one of the extreme curvatures.
        let cloud: Vec<Point2D> = (0..20)
            .map(|i| Point2D::new(1.0, -0.475 + 0.05 * i as f64))
            .collect();
        let best = toc.evaluate_paths(&cloud);

        assert!(best.curvature.abs() <= car.limits.max_curvature);
        assert!(best.score > SENTINEL_SCORE);
    }

    #[test]
    fn test_generate_command_accelerates_in_open_space() {
        let car = car();
        let toc = controller(&car);

        let command = toc.generate_command(&[], 0.0);

        assert_relative_eq!(command.velocity, 0.2);
        assert!(command.curvature.abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_point() {
        let car = car();
        let toc = controller(&car);

        let cloud = vec![Point2D::new(f64::NAN, 0.0)];
        let command = toc.generate_command(&cloud, 0.5);

        assert_relative_eq!(command.velocity, 0.3);
        assert_relative_eq!(command.curvature, 0.0);
    }

    #[test]
    fn test_rejects_negative_speed() {
        let car = car();
        let toc = controller(&car);

        let command = toc.generate_command(&[], -0.4);

        assert_relative_eq!(command.velocity, 0.0);
        assert_relative_eq!(command.curvature, 0.0);
    }

    #[test]
    fn test_rejects_non_finite_speed() {
        let car = car();
        let toc = controller(&car);

        let command = toc.generate_command(&[], f64::NAN);

        assert_relative_eq!(command.velocity, 0.0);
        assert_relative_eq!(command.curvature, 0.0);
    }
}
