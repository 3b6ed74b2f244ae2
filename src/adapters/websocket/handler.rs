//! WebSocket upgrade handler for viewer connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the session lifecycle:
//! 1. Upgrade (a rejected handshake never creates a session)
//! 2. Queue the CONNECTED acknowledgement, then register
//! 3. Write queued payloads and read (and ignore) client frames
//! 4. On peer close, protocol error, send failure, eviction or shutdown,
//!    deregister and discard the session

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Response},
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::domain::foundation::{ClientId, StateMachine, Timestamp};
use crate::domain::session::SessionStatus;

use super::{
    messages::{Payload, ServerMessage},
    registry::ClientRegistry,
    session::ClientSession,
};

/// Per-session delivery limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Longest a single socket write may take before the viewer is dropped.
    pub send_timeout: Duration,

    /// Payloads a viewer may have queued before it counts as failed.
    pub queue_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(2),
            queue_capacity: 64,
        }
    }
}

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub registry: Arc<ClientRegistry>,
    pub settings: SessionSettings,
    /// Flips to `true` when the server shuts down.
    pub shutdown: watch::Receiver<bool>,
}

impl WebSocketState {
    pub fn new(
        registry: Arc<ClientRegistry>,
        settings: SessionSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            registry,
            settings,
            shutdown,
        }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    PeerClosed,
    SendFailed,
    Evicted,
    Shutdown,
}

#[derive(Debug, Error)]
enum WriteError {
    #[error("send timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),
}

/// Handle WebSocket upgrade requests from viewers.
///
/// Route: `GET /` and `GET /ws`. Any origin is accepted.
pub async fn ws_handler(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    State(state): State<WebSocketState>,
) -> Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Rejected websocket handshake");
            return rejection.into_response();
        }
    };

    ws.on_failed_upgrade(|e| tracing::debug!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Run one viewer session from upgrade to discard.
async fn handle_socket(socket: WebSocket, state: WebSocketState) {
    let client_id = ClientId::new();
    let mut status = SessionStatus::Connecting;
    let (sender, receiver) = socket.split();
    let (session, outbound) = ClientSession::new(client_id, state.settings.queue_capacity);

    // The acknowledgement is queued before the session becomes visible to
    // broadcasts, so it is always the first frame the viewer sees.
    let ack = ServerMessage::connected(client_id, Timestamp::now());
    let queued = ack
        .to_payload()
        .map_err(|e| e.to_string())
        .and_then(|payload| session.try_deliver(payload).map_err(|e| e.to_string()));
    if let Err(e) = queued {
        tracing::debug!(client_id = %client_id, "Failed to queue connected message: {}", e);
        advance(&mut status, SessionStatus::Closing, client_id);
        session.close();
        advance(&mut status, SessionStatus::Closed, client_id);
        return;
    }

    state.registry.register(Arc::clone(&session));
    advance(&mut status, SessionStatus::Open, client_id);
    tracing::info!(
        client_id = %client_id,
        viewers = state.registry.len(),
        "Viewer connected"
    );

    let mut send_task = tokio::spawn(write_loop(
        sender,
        outbound,
        Arc::clone(&session),
        state.settings.send_timeout,
    ));
    let mut recv_task = tokio::spawn(read_loop(receiver, client_id));
    let mut shutdown = state.shutdown.clone();

    let reason = tokio::select! {
        result = &mut send_task => {
            recv_task.abort();
            match result {
                Ok(Ok(())) => CloseReason::Evicted,
                Ok(Err(e)) => {
                    tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
                    CloseReason::SendFailed
                }
                Err(_) => CloseReason::SendFailed,
            }
        }
        _ = &mut recv_task => {
            send_task.abort();
            CloseReason::PeerClosed
        }
        _ = session.closed() => {
            send_task.abort();
            recv_task.abort();
            CloseReason::Evicted
        }
        _ = wait_for_shutdown(&mut shutdown) => {
            send_task.abort();
            recv_task.abort();
            CloseReason::Shutdown
        }
    };

    advance(&mut status, SessionStatus::Closing, client_id);
    state.registry.deregister_session(&session);
    advance(&mut status, SessionStatus::Closed, client_id);

    tracing::info!(
        client_id = %client_id,
        reason = ?reason,
        viewers = state.registry.len(),
        "Viewer disconnected"
    );
}

/// Drain the session's queue onto the socket.
///
/// Ends with `Ok` once the session is closed elsewhere.
async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Payload>,
    session: Arc<ClientSession>,
    send_timeout: Duration,
) -> Result<(), WriteError> {
    while let Some(payload) = outbound.recv().await {
        if session.is_closed() {
            break;
        }
        let frame = Message::Text(payload.to_string());
        match tokio::time::timeout(send_timeout, sender.send(frame)).await {
            Ok(result) => result?,
            Err(_) => return Err(WriteError::Timeout(send_timeout)),
        }
    }
    Ok(())
}

/// Read client frames until the peer goes away. Content is ignored.
async fn read_loop(mut receiver: SplitStream<WebSocket>, client_id: ClientId) {
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Close(_)) => {
                tracing::debug!(client_id = %client_id, "Client sent close frame");
                break;
            }
            Ok(Message::Text(_)) | Ok(Message::Binary(_)) => {
                tracing::trace!(client_id = %client_id, "Ignoring inbound message");
            }
            // Protocol ping/pong is answered by axum
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Err(e) => {
                tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                break;
            }
        }
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        // Sender gone without a shutdown: nothing will ever signal.
        std::future::pending::<()>().await;
    }
}

fn advance(status: &mut SessionStatus, next: SessionStatus, client_id: ClientId) {
    match status.transition_to(next) {
        Ok(next) => *status = next,
        Err(e) => tracing::warn!(client_id = %client_id, "Session state anomaly: {}", e),
    }
}

/// Create axum router for the viewer endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router().with_state(ws_state));
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
}
