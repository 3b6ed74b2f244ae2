//! HTTP DTOs for status endpoints.

use serde::Serialize;

use crate::domain::button::Level;
use crate::domain::foundation::{ButtonId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Snapshot of the relay.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub connected_clients: usize,
    pub debounce_window_ms: u64,
    pub emit_released: bool,
    /// Event source that configured its pins, `null` until one has.
    pub source: Option<&'static str>,
    pub gpio_ready: bool,
    pub buttons: Vec<ButtonStatusResponse>,
}

/// One configured button.
#[derive(Debug, Clone, Serialize)]
pub struct ButtonStatusResponse {
    pub button: ButtonId,
    pub pin: u32,
    /// Last level sampled from the pin, bounces included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Seconds since the Unix epoch, absent until the first accepted event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event_at: Option<f64>,
}

impl ButtonStatusResponse {
    pub fn new(
        button: ButtonId,
        pin: u32,
        level: Option<Level>,
        last_accepted: Option<Timestamp>,
    ) -> Self {
        Self {
            button,
            pin,
            level,
            last_event_at: last_accepted.map(|t| t.as_unix_secs_f64()),
        }
    }
}

/// Outcome of a manual press.
#[derive(Debug, Clone, Serialize)]
pub struct PressResponse {
    pub button: ButtonId,
    /// False when the debouncer suppressed the press.
    pub accepted: bool,
    /// Viewers connected when the press was handled.
    pub clients: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
        }
    }
}
