//! Error types for SarathiNav.

use thiserror::Error;

/// SarathiNav error type.
///
/// Only configuration loading and parameter validation can fail. The control
/// path never returns an error: every tick produces a command, because a
/// motion controller that refuses to answer strands the actuator.
#[derive(Error, Debug)]
pub enum SarathiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid vehicle geometry: {0}")]
    Vehicle(&'static str),

    #[error("Invalid controller parameter: {0}")]
    Parameter(&'static str),
}

impl From<toml::de::Error> for SarathiError {
    fn from(e: toml::de::Error) -> Self {
        SarathiError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SarathiError>;
