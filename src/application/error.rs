//! Startup error types

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::{ConfigError, ValidationError};
use crate::ports::SourceError;

/// Failures that stop the relay from starting. None of these are retried.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("Event source '{name}' failed to start: {source}")]
    Source {
        name: &'static str,
        #[source]
        source: SourceError,
    },

    #[error("Cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
