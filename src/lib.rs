//! SarathiNav - reactive time-optimal motion control for car-like robots
//!
//! On every control tick the controller consumes a point cloud of nearby
//! obstacles (in the robot body frame, +x forward, +y left) together with
//! the measured forward speed, samples a family of constant-curvature
//! arcs, and emits a `(speed, curvature)` command that makes progress
//! toward a fixed forward goal without contact. A latency-compensating
//! wrapper replays the commands still in flight so the sampler sees the
//! world from the pose the vehicle will actually occupy.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  latency                     │  ← command history,
//! │             (LatencyCompensator)             │    forward simulation,
//! └──────────────────────────────────────────────┘    cloud reframing
//!                        │
//! ┌──────────────────────────────────────────────┐
//! │                  control/                    │  ← arc evaluation,
//! │   (TimeOptimalController, speed rule)        │    scoring, 1D speed
//! └──────────────────────────────────────────────┘
//!                        │
//! ┌──────────────────────────────────────────────┐
//! │          core/ · vehicle · scan              │  ← value types, ICR
//! │                                              │    math, clock, input
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The compensator exclusively owns its controller and history; both
//! borrow the [`Car`] they steer, which must outlive them. Everything runs
//! on the caller's thread, one tick is one plain function call, and every
//! tick returns a command: bad input degrades to straight-line braking and
//! an unavoidable collision degrades to deceleration with a warning.
//!
//! # Example
//!
//! ```
//! use sarathi_nav::{Car, ControllerParams, LatencyCompensator, Point2D};
//!
//! let car = Car::default();
//! let mut controller = LatencyCompensator::new(&car, ControllerParams::default(), 0.15);
//!
//! let cloud = vec![Point2D::new(2.0, 0.1)];
//! let sensor_stamp = controller.now();
//! let command = controller.generate_command(&cloud, 0.0, sensor_stamp);
//!
//! assert!(command.velocity > 0.0);
//! ```

// ============================================================================
// Layer 1: foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;
pub mod vehicle;

// ============================================================================
// Layer 2: input and configuration (depends on core)
// ============================================================================
pub mod config;
pub mod scan;

// ============================================================================
// Layer 3: path sampling and speed control (depends on core, vehicle)
// ============================================================================
pub mod control;

// ============================================================================
// Layer 4: latency compensation (depends on everything below)
// ============================================================================
pub mod latency;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::SarathiConfig;
pub use control::{
    ControllerParams, PathCandidate, SpeedRegime, TimeOptimalController, SPEED_SNAP_BAND,
};
pub use core::math;
pub use core::time::MonotonicClock;
pub use core::types::{Command, CommandStamped, Point2D, Pose2D, State2D};
pub use error::{Result, SarathiError};
pub use latency::LatencyCompensator;
pub use scan::LaserScan;
pub use vehicle::{Car, Dimensions, Limits};
