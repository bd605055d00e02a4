//! 1D time-optimal speed selection along the chosen arc.

use crate::vehicle::Limits;

/// Band around `max_speed` inside which the measured speed is snapped to
/// exactly `max_speed` before classification. Without the snap, sensor
/// noise would keep the cruise branch unreachable.
pub const SPEED_SNAP_BAND: f64 = 0.05;

/// Which branch of the speed rule produced the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedRegime {
    /// Room to speed up one step and still stop within the free path.
    Accelerate,
    /// At top speed with enough stopping room ahead.
    Cruise,
    /// Free path shorter than the stopping distance; shedding speed.
    Decelerate,
    /// Stopping within the free path is no longer possible; braking anyway.
    CollisionImminent,
}

/// Pick the next commanded speed for the measured speed and free path.
///
/// The accelerate branch demands room for the *post-acceleration* stopping
/// distance, which is why it never fires when deceleration is already due.
/// The result is clamped to `[0, max_speed]`.
pub(crate) fn plan(
    limits: &Limits,
    control_interval: f64,
    current_speed: f64,
    free_path_length: f64,
) -> (f64, SpeedRegime) {
    let dt = control_interval;
    let step = limits.max_acceleration * dt;

    let mut speed = current_speed;
    if (speed - limits.max_speed).abs() <= SPEED_SNAP_BAND {
        speed = limits.max_speed;
    }

    let (next, regime) = if speed < limits.max_speed
        && free_path_length >= speed * dt + step * dt / 2.0 + limits.braking_distance(speed + step)
    {
        (speed + step, SpeedRegime::Accelerate)
    } else if speed == limits.max_speed
        && free_path_length >= speed * dt + limits.braking_distance(limits.max_speed)
    {
        // Exact equality is reachable through the snap above.
        (speed, SpeedRegime::Cruise)
    } else if free_path_length < limits.braking_distance(speed) {
        let regime = if free_path_length < 0.0 {
            SpeedRegime::CollisionImminent
        } else {
            SpeedRegime::Decelerate
        };
        (speed - step, regime)
    } else {
        (speed - step, SpeedRegime::CollisionImminent)
    };

    (next.clamp(0.0, limits.max_speed), regime)
}
