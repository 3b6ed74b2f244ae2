//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BUTTON_RELAY` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use button_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod broadcast;
mod buttons;
mod debounce;
mod error;
mod server;
mod source;

pub use broadcast::BroadcastConfig;
pub use buttons::{ButtonsConfig, PinMapping};
pub use debounce::DebounceSettings;
pub use error::{ConfigError, ValidationError};
pub use server::{LogFormat, ServerConfig};
pub use source::{SourceConfig, SourceKind};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// two-button setup on port 8765.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Listener and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// Debounce window and release emission
    #[serde(default)]
    pub debounce: DebounceSettings,

    /// Pin → button mapping and polarity
    #[serde(default)]
    pub buttons: ButtonsConfig,

    /// Which event source to start
    #[serde(default)]
    pub source: SourceConfig,

    /// Per-viewer delivery limits
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BUTTON_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BUTTON_RELAY__SERVER__PORT=8765` -> `server.port = 8765`
    /// - `BUTTON_RELAY__BUTTONS__PINS=18:1,19:2` -> `buttons.pins = "18:1,19:2"`
    /// - `BUTTON_RELAY__DEBOUNCE__WINDOW_MS=50` -> `debounce.window_ms = 50`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BUTTON_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.buttons.validate()?;
        self.source.validate()?;
        self.broadcast.validate()?;
        Ok(())
    }
}
