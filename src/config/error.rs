//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Invalid pin mapping entry '{0}', expected <pin>:<button>")]
    InvalidPinMapping(String),

    #[error("No buttons configured")]
    NoButtonsConfigured,

    #[error("GPIO pin {0} is mapped more than once")]
    DuplicatePin(u32),

    #[error("Button {0} is mapped to more than one pin")]
    DuplicateButton(u16),

    #[error("Send timeout must be between 1ms and 60s")]
    InvalidSendTimeout,

    #[error("Client queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("Poll interval must be at least 1ms")]
    InvalidPollInterval,
}
