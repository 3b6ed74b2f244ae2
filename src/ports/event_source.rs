//! EventSource port - Interface for whatever detects pin edges.
//!
//! The source owns pin configuration (pull resistors, edge polarity,
//! export/unexport) and reports level changes to a [`TransitionSink`].
//! Starting a source is the only fallible step; once running it reports
//! transitions until the shutdown signal flips.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use super::TransitionSink;

/// Errors that can occur while bringing up an event source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A pin could not be configured. Fatal at startup.
    #[error("GPIO pin {pin} could not be configured: {reason}")]
    Configuration { pin: u32, reason: String },

    /// The source is not usable at all on this host.
    #[error("Event source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn configuration(pin: u32, reason: impl Into<String>) -> Self {
        SourceError::Configuration {
            pin,
            reason: reason.into(),
        }
    }
}

/// Port for starting a hardware (or simulated) edge detector.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Configure the inputs and begin reporting transitions to `sink`.
    ///
    /// Returns once the source is running; reporting continues in the
    /// background until `shutdown` becomes `true`.
    async fn start(
        &self,
        sink: Arc<dyn TransitionSink>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), SourceError>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}
