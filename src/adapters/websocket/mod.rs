//! WebSocket adapters for pushing button events to viewers.
//!
//! # Architecture
//!
//! ```text
//!            ButtonEvent (from the input path)
//!                         │
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Broadcaster                                 │
//! │   - Serializes the event once                                       │
//! │   - Snapshots the registry and queues the payload per viewer        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                         │
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        ClientRegistry                                │
//! │   ├── session-a  ──► queue ──► writer task ──► socket               │
//! │   ├── session-b  ──► queue ──► writer task ──► socket               │
//! │   └── session-c  ──► queue ──► writer task ──► socket               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire message types
//! - [`session`] - One connected viewer and its outbound queue
//! - [`registry`] - Set of open sessions
//! - [`broadcaster`] - Fan-out of events to the registry
//! - [`handler`] - Axum WebSocket upgrade handler (connection acceptor)

pub mod broadcaster;
pub mod handler;
pub mod messages;
pub mod registry;
pub mod session;

pub use broadcaster::Broadcaster;
pub use handler::{websocket_router, ws_handler, SessionSettings, WebSocketState};
pub use messages::{Payload, ServerMessage, WireEvent};
pub use registry::ClientRegistry;
pub use session::{ClientSession, DeliveryError};
