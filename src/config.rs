//! Configuration loading for SarathiNav.

use std::path::Path;

use serde::Deserialize;

use crate::control::ControllerParams;
use crate::error::{Result, SarathiError};
use crate::vehicle::Car;

/// Top-level configuration: vehicle description, controller tuning, and
/// actuation latency.
///
/// Every field has a default matching the reference vehicle, so a partial
/// (or empty) TOML file yields a runnable configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SarathiConfig {
    #[serde(default)]
    pub vehicle: Car,

    #[serde(default)]
    pub controller: ControllerParams,

    /// Delay between issuing a command and seeing its effect in sensor
    /// data (seconds).
    #[serde(default = "default_latency")]
    pub latency: f64,
}

impl Default for SarathiConfig {
    fn default() -> Self {
        Self {
            vehicle: Car::default(),
            controller: ControllerParams::default(),
            latency: default_latency(),
        }
    }
}

impl SarathiConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SarathiError::Config(format!("Failed to read config file: {}", e)))?;
        let config: SarathiConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every range invariant the controller relies on.
    pub fn validate(&self) -> Result<()> {
        self.vehicle.validate()?;
        self.controller.validate()?;
        if !(self.latency > 0.0) {
            return Err(SarathiError::Parameter("latency must be positive"));
        }
        Ok(())
    }
}

fn default_latency() -> f64 {
    0.15
}
