//! WebSocket message types pushed to viewers.
//!
//! One JSON object per text frame, server → client only:
//!
//! ```text
//! {"event":"CONNECTED","timestamp":1700000000.5,"client_id":"…"}
//! {"event":"PRESSED","button":1,"timestamp":1700000001.25}
//! {"event":"RELEASED","button":1,"timestamp":1700000001.5}
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::domain::button::{ButtonEvent, ButtonEventKind};
use crate::domain::foundation::{ButtonId, ClientId, Timestamp};

/// A serialized message, shared between every session it is queued for.
pub type Payload = Arc<str>;

/// Value of the `event` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WireEvent {
    Pressed,
    Released,
    Connected,
}

impl From<ButtonEventKind> for WireEvent {
    fn from(kind: ButtonEventKind) -> Self {
        match kind {
            ButtonEventKind::Pressed => WireEvent::Pressed,
            ButtonEventKind::Released => WireEvent::Released,
        }
    }
}

/// Message sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerMessage {
    pub event: WireEvent,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<ButtonId>,

    /// Seconds since the Unix epoch.
    pub timestamp: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl ServerMessage {
    /// Acknowledgement sent once, before anything else, on a new connection.
    pub fn connected(client_id: ClientId, at: Timestamp) -> Self {
        Self {
            event: WireEvent::Connected,
            button: None,
            timestamp: at.as_unix_secs_f64(),
            client_id: Some(client_id.to_string()),
        }
    }

    /// Serialize to the shared payload form.
    pub fn to_payload(&self) -> Result<Payload, serde_json::Error> {
        serde_json::to_string(self).map(Payload::from)
    }
}

impl From<&ButtonEvent> for ServerMessage {
    fn from(event: &ButtonEvent) -> Self {
        Self {
            event: event.kind.into(),
            button: Some(event.button),
            timestamp: event.timestamp.as_unix_secs_f64(),
            client_id: None,
        }
    }
}
