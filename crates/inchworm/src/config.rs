//! Runner configuration

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Configuration for a [`Runner`](crate::runner::Runner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Drop progress reports equal to the last delivered value.
    pub coalesce_repeats: bool,

    /// Emit `Progress` events. When false only `Started` and `Finished`
    /// flow; the work still runs and can still be cancelled.
    pub report_progress: bool,

    /// Minimum percentage delta between delivered progress events. A value
    /// of 0 delivers every non-decreasing report. A report of 100 is always
    /// delivered regardless of the step.
    pub min_step: u8,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            coalesce_repeats: true,
            report_progress: true,
            min_step: 0,
        }
    }
}

impl RunnerConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable coalescing of repeated progress values
    pub fn with_coalesce_repeats(mut self, enabled: bool) -> Self {
        self.coalesce_repeats = enabled;
        self
    }

    /// Enable or disable progress events
    pub fn with_report_progress(mut self, enabled: bool) -> Self {
        self.report_progress = enabled;
        self
    }

    /// Set the minimum delta between delivered progress events
    pub fn with_min_step(mut self, min_step: u8) -> ConfigResult<Self> {
        if min_step > 100 {
            return Err(ConfigError::invalid_min_step(min_step));
        }
        self.min_step = min_step;
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_step > 100 {
            return Err(ConfigError::invalid_min_step(self.min_step));
        }
        Ok(())
    }

    /// Configuration for tests: deliver every report, including repeats.
    pub fn for_testing() -> Self {
        Self {
            coalesce_repeats: false,
            report_progress: true,
            min_step: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.coalesce_repeats);
        assert!(config.report_progress);
        assert_eq!(config.min_step, 0);
    }

    #[test]
    fn test_config_builder() {
        let config = RunnerConfig::new()
            .with_coalesce_repeats(false)
            .with_report_progress(false)
            .with_min_step(5)
            .unwrap();

        assert!(!config.coalesce_repeats);
        assert!(!config.report_progress);
        assert_eq!(config.min_step, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let result = RunnerConfig::new().with_min_step(101);
        assert_eq!(result.unwrap_err(), ConfigError::invalid_min_step(101));

        let mut config = RunnerConfig::default();
        config.min_step = 200;
        assert!(config.validate().is_err());
    }
}
