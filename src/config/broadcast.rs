//! Broadcast delivery configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_SEND_TIMEOUT_MS: u64 = 60_000;

/// Broadcast delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Longest a single write to a viewer may take
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,

    /// Messages a viewer may have pending before it is dropped
    #[serde(default = "default_client_queue_capacity")]
    pub client_queue_capacity: usize,
}

impl BroadcastConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Validate broadcast configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.send_timeout_ms == 0 || self.send_timeout_ms > MAX_SEND_TIMEOUT_MS {
            return Err(ValidationError::InvalidSendTimeout);
        }
        if self.client_queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        Ok(())
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: default_send_timeout_ms(),
            client_queue_capacity: default_client_queue_capacity(),
        }
    }
}

fn default_send_timeout_ms() -> u64 {
    2_000
}

fn default_client_queue_capacity() -> usize {
    64
}
