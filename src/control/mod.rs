//! Time-optimal path sampling over constant-curvature arcs.
//!
//! The [`TimeOptimalController`] sweeps curvatures, evaluates each arc's
//! free path length and clearance against the obstacle cloud, scores the
//! candidates, and turns the winner into a speed and curvature command.

mod arc;
mod sampler;
mod speed;

pub use sampler::{PathCandidate, TimeOptimalController};
pub use speed::{SpeedRegime, SPEED_SNAP_BAND};

use serde::Deserialize;

use crate::error::{Result, SarathiError};

/// Immutable tuning of the sampler.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ControllerParams {
    /// Length of one control tick (seconds).
    #[serde(default = "default_control_interval")]
    pub control_interval: f64,

    /// Additive lateral safety buffer around the footprint (meters).
    #[serde(default = "default_margin")]
    pub margin: f64,

    /// Cap on the lateral clearance search (meters).
    #[serde(default = "default_max_clearance")]
    pub max_clearance: f64,

    /// Step between sampled curvatures (1/meters).
    #[serde(default = "default_curvature_sampling_interval")]
    pub curvature_sampling_interval: f64,

    /// Sensing horizon bounding every free path (meters).
    #[serde(default = "default_horizon")]
    pub horizon: f64,

    /// Use the exact radial offset `|r - R|` for arc clearance instead of
    /// the chord projection `|r·cosθ - R|`.
    #[serde(default)]
    pub exact_arc_clearance: bool,
}

impl ControllerParams {
    /// Check the parameter range invariants.
    pub fn validate(&self) -> Result<()> {
        if !(self.control_interval > 0.0) {
            return Err(SarathiError::Parameter("control_interval must be positive"));
        }
        if !(self.margin >= 0.0) {
            return Err(SarathiError::Parameter("margin cannot be negative"));
        }
        if !(self.max_clearance > 0.0) {
            return Err(SarathiError::Parameter("max_clearance must be positive"));
        }
        if !(self.curvature_sampling_interval > 0.0) {
            return Err(SarathiError::Parameter(
                "curvature_sampling_interval must be positive",
            ));
        }
        if !(self.horizon > 0.0) {
            return Err(SarathiError::Parameter("horizon must be positive"));
        }
        Ok(())
    }
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            control_interval: default_control_interval(),
            margin: default_margin(),
            max_clearance: default_max_clearance(),
            curvature_sampling_interval: default_curvature_sampling_interval(),
            horizon: default_horizon(),
            exact_arc_clearance: false,
        }
    }
}

// Default value functions
fn default_control_interval() -> f64 {
    0.05
}
fn default_margin() -> f64 {
    0.05
}
fn default_max_clearance() -> f64 {
    0.5
}
fn default_curvature_sampling_interval() -> f64 {
    0.05
}
fn default_horizon() -> f64 {
    10.0
}
