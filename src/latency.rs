//! Latency compensation over the time-optimal controller.
//!
//! Commands that have been issued but are not yet visible in sensor data
//! are replayed onto the measured state to predict where the vehicle will
//! be when the next command takes effect. The obstacle cloud is then
//! re-expressed in that predicted frame before the sampler runs, and the
//! emitted command joins the history for the next tick.

use std::collections::VecDeque;

use crate::control::{ControllerParams, TimeOptimalController};
use crate::core::math::STRAIGHT_CURVATURE_EPS;
use crate::core::time::MonotonicClock;
use crate::core::types::{Command, CommandStamped, Point2D, State2D};
use crate::vehicle::Car;

/// Latency-compensating wrapper around [`TimeOptimalController`].
///
/// Owns its inner controller, its command history, and its clock; borrows
/// the vehicle, which must outlive it. Single-threaded by construction:
/// one owner, one tick at a time, nothing blocks.
pub struct LatencyCompensator<'a> {
    /// Delay between issuing a command and seeing its effect in sensor
    /// data (seconds).
    latency: f64,
    controller: TimeOptimalController<'a>,
    /// In-flight commands, oldest first, stamps non-decreasing.
    history: VecDeque<CommandStamped>,
    clock: MonotonicClock,
}

impl<'a> LatencyCompensator<'a> {
    /// Create a compensator for `car` with the given tuning and latency.
    pub fn new(car: &'a Car, params: ControllerParams, latency: f64) -> Self {
        Self {
            latency,
            controller: TimeOptimalController::new(car, params),
            history: VecDeque::new(),
            clock: MonotonicClock::new(),
        }
    }

    /// Seconds on the compensator's monotonic clock.
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &TimeOptimalController<'a> {
        &self.controller
    }

    /// Commands still considered in flight, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &CommandStamped> + '_ {
        self.history.iter()
    }

    /// Append a command stamped with the current clock reading.
    pub fn record_command(&mut self, command: Command) {
        let stamp = self.clock.now();
        self.record_stamped(CommandStamped::new(command, stamp));
    }

    /// Append an explicitly stamped command.
    ///
    /// A stamp earlier than the newest history entry is clamped to it, so
    /// the history ordering invariant holds even against a misbehaving
    /// caller clock.
    pub fn record_stamped(&mut self, mut stamped: CommandStamped) {
        if let Some(tail) = self.history.back() {
            if stamped.stamp < tail.stamp {
                log::debug!(
                    "clamping command stamp {:.6} to history tail {:.6}",
                    stamped.stamp,
                    tail.stamp
                );
                stamped.stamp = tail.stamp;
            }
        }
        self.history.push_back(stamped);
    }

    /// Run one control tick against a cloud captured at `sensor_stamp`.
    ///
    /// The cloud must be in the body frame as of `sensor_stamp`, +x
    /// forward, +y left; the caller's buffer is left untouched.
    pub fn generate_command(
        &mut self,
        cloud: &[Point2D],
        current_speed: f64,
        sensor_stamp: f64,
    ) -> Command {
        log::trace!(
            "tick: {} points, sensor data {:.3} s old",
            cloud.len(),
            self.clock.now() - sensor_stamp
        );

        let state = self.project_state(current_speed);
        let cloud = self.transform_cloud(cloud, &state);
        let command = self.controller.generate_command(&cloud, state.speed);
        self.record_command(command);
        command
    }

    /// Free path length along `curvature` in the predicted frame, seeded
    /// with zero speed. Diagnostic probe: prunes the history like a tick
    /// but records nothing.
    pub fn free_path_length(
        &mut self,
        cloud: &[Point2D],
        curvature: f64,
        _sensor_stamp: f64,
    ) -> f64 {
        let state = self.project_state(0.0);
        let cloud = self.transform_cloud(cloud, &state);
        self.controller.free_path_length(&cloud, curvature)
    }

    /// Replay the in-flight commands onto a seed state.
    ///
    /// Entries whose effect is already visible in sensor data, those
    /// recorded at least `latency` seconds ago, are pruned from the head
    /// first. With an empty history the seed state comes back unchanged.
    pub fn project_state(&mut self, current_speed: f64) -> State2D {
        let mut state = State2D::seed(current_speed);
        if self.history.is_empty() {
            return state;
        }

        let now = self.clock.now();
        while let Some(head) = self.history.front() {
            if now - head.stamp < self.latency {
                break;
            }
            self.history.pop_front();
        }

        for stamped in &self.history {
            let command = stamped.command;
            let distance = command.velocity * self.controller.control_interval();
            if command.curvature.abs() > STRAIGHT_CURVATURE_EPS {
                let radius = 1.0 / command.curvature;
                let dtheta = distance / radius;
                state.pose.x += distance * dtheta.cos();
                state.pose.y += distance * dtheta.sin();
                state.pose.theta += dtheta;
            } else {
                state.pose.x += distance;
            }
            state.speed = command.velocity;
        }

        log::trace!(
            "projected over {} commands: ({:.3}, {:.3}, {:.3} rad) at {:.3} m/s",
            self.history.len(),
            state.pose.x,
            state.pose.y,
            state.pose.theta,
            state.speed
        );
        state
    }

    /// Re-express `cloud` in the predicted body frame. Returns a fresh
    /// copy; the input stays untouched.
    pub fn transform_cloud(&self, cloud: &[Point2D], state: &State2D) -> Vec<Point2D> {
        cloud
            .iter()
            .map(|point| state.pose.inverse_transform_point(point))
            .collect()
    }
}
