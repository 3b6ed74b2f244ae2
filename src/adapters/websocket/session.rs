//! Server-side state for one connected viewer.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::domain::foundation::{ClientId, Timestamp};

use super::messages::Payload;

/// Why a payload could not be queued for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("session is closed")]
    Closed,

    #[error("outbound queue is full")]
    QueueFull,
}

/// One connected viewer.
///
/// Holds the sending half of the session's outbound queue; the receiving
/// half belongs to the task that writes to the socket. Closing is one-way
/// and visible to every holder of the session.
#[derive(Debug)]
pub struct ClientSession {
    id: ClientId,
    connected_at: Timestamp,
    outbound: mpsc::Sender<Payload>,
    closed: watch::Sender<bool>,
}

impl ClientSession {
    /// Creates a session with a bounded outbound queue.
    ///
    /// Returns the session and the receiver its writer drains.
    pub fn new(id: ClientId, queue_capacity: usize) -> (Arc<Self>, mpsc::Receiver<Payload>) {
        let (outbound, rx) = mpsc::channel(queue_capacity.max(1));
        let (closed, _) = watch::channel(false);
        let session = Arc::new(Self {
            id,
            connected_at: Timestamp::now(),
            outbound,
            closed,
        });
        (session, rx)
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    /// Queue a payload without waiting.
    pub fn try_deliver(&self, payload: Payload) -> Result<(), DeliveryError> {
        if self.is_closed() {
            return Err(DeliveryError::Closed);
        }
        self.outbound.try_send(payload).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Mark the session closed. Returns true for the call that closed it.
    pub fn close(&self) -> bool {
        self.closed.send_if_modified(|closed| {
            if *closed {
                false
            } else {
                *closed = true;
                true
            }
        })
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Resolves once the session has been closed.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        // The sender lives in `self`, so this only ends once closed.
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn payload(s: &str) -> Payload {
        Payload::from(s)
    }

    #[tokio::test]
    async fn delivered_payloads_arrive_in_order() {
        let (session, mut rx) = ClientSession::new(ClientId::new(), 8);

        session.try_deliver(payload("one")).unwrap();
        session.try_deliver(payload("two")).unwrap();

        assert_eq!(rx.recv().await.as_deref(), Some("one"));
        assert_eq!(rx.recv().await.as_deref(), Some("two"));
    }

    #[test]
    fn full_queue_is_reported() {
        let (session, _rx) = ClientSession::new(ClientId::new(), 1);

        session.try_deliver(payload("a")).unwrap();
        assert_eq!(session.try_deliver(payload("b")), Err(DeliveryError::QueueFull));
    }

    #[test]
    fn dropped_receiver_reports_closed() {
        let (session, rx) = ClientSession::new(ClientId::new(), 4);
        drop(rx);

        assert_eq!(session.try_deliver(payload("a")), Err(DeliveryError::Closed));
    }

    #[test]
    fn closed_session_rejects_delivery() {
        let (session, _rx) = ClientSession::new(ClientId::new(), 4);

        assert!(session.close());
        assert!(!session.close());
        assert_eq!(session.try_deliver(payload("a")), Err(DeliveryError::Closed));
    }

    #[tokio::test]
    async fn closed_future_resolves_after_close() {
        let (session, _rx) = ClientSession::new(ClientId::new(), 4);

        let waiter = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.closed().await })
        };
        session.close();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("closed() should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn closed_future_resolves_immediately_when_already_closed() {
        let (session, _rx) = ClientSession::new(ClientId::new(), 4);
        session.close();

        tokio::time::timeout(Duration::from_millis(100), session.closed())
            .await
            .expect("already closed");
    }
}
