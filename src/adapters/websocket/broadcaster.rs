//! Fan-out of debounced button events to every connected viewer.
//!
//! # Delivery Flow
//!
//! ```text
//! ButtonEvent
//!      │
//!      ▼
//! ┌────────────────────┐
//! │ Serialize once     │
//! └────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐
//! │ Snapshot registry  │
//! └────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐      full / closed
//! │ try_send to each   │ ───────────────────► deregister viewer
//! │ session's queue    │
//! └────────────────────┘
//!      │
//!      ▼
//!  per-session writer task (bounded by send timeout)
//! ```
//!
//! Publishing never waits on the network; a viewer's writer task does the
//! socket write and fails the session if it times out.

use std::sync::Arc;

use crate::domain::button::ButtonEvent;
use crate::ports::ButtonEventPublisher;

use super::messages::{Payload, ServerMessage};
use super::registry::ClientRegistry;

/// Pushes serialized events into every registered session's queue.
pub struct Broadcaster {
    registry: Arc<ClientRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ClientRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }

    /// Serialize `message` once and queue it for every open session.
    ///
    /// Returns the number of sessions it was queued for.
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        match message.to_payload() {
            Ok(payload) => self.fan_out(payload),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize broadcast message");
                0
            }
        }
    }

    fn fan_out(&self, payload: Payload) -> usize {
        let sessions = self.registry.snapshot();
        let mut delivered = 0;

        for session in sessions {
            match session.try_deliver(Arc::clone(&payload)) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(
                        client_id = %session.id(),
                        error = %e,
                        "Delivery failed, dropping viewer"
                    );
                    self.registry.deregister_session(&session);
                }
            }
        }

        delivered
    }
}

impl ButtonEventPublisher for Broadcaster {
    fn publish(&self, event: &ButtonEvent) -> usize {
        let delivered = self.broadcast(&ServerMessage::from(event));
        tracing::debug!(
            button = %event.button,
            kind = %event.kind,
            viewers = delivered,
            "Button event published"
        );
        delivered
    }
}
