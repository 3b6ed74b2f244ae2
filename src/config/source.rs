//! Event source configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;

/// Which event source drives the buttons
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Linux GPIO sysfs interface
    #[default]
    Sysfs,
    /// No hardware; events come only from the manual trigger endpoint
    Simulated,
}

/// Event source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,

    /// Root of the GPIO sysfs tree
    #[serde(default = "default_gpio_root")]
    pub gpio_root: PathBuf,

    /// How often pin levels are sampled
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl SourceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Validate source configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 {
            return Err(ValidationError::InvalidPollInterval);
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            gpio_root: default_gpio_root(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_gpio_root() -> PathBuf {
    PathBuf::from("/sys/class/gpio")
}

fn default_poll_interval_ms() -> u64 {
    5
}
