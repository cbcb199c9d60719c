//! Error types for the inchworm runner

use thiserror::Error;

/// Main error type for runner operations
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("a run is already in progress")]
    AlreadyRunning,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid minimum progress step: {value} (must be <= 100)")]
    InvalidMinStep { value: u8 },
}

/// Result type alias for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl RunnerError {
    /// Check if this error signals that a run was rejected because one is
    /// already in flight.
    pub fn is_already_running(&self) -> bool {
        matches!(self, RunnerError::AlreadyRunning)
    }
}

impl ConfigError {
    /// Create an invalid minimum step error
    pub fn invalid_min_step(value: u8) -> Self {
        ConfigError::InvalidMinStep { value }
    }
}
