//! Registry of connected viewer sessions.
//!
//! The registry is shared between the connection acceptor (which adds and
//! removes sessions) and the broadcaster (which reads snapshots). Broadcasts
//! copy the session list under a short read lock and deliver without it, so
//! a slow broadcast never holds up a new connection.
//!
//! # Invariant
//!
//! A session is in the registry iff its connection is believed alive.
//! Removing a session closes it, so a snapshot taken just before removal
//! cannot push anything further to that viewer.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::foundation::ClientId;

use super::session::ClientSession;

/// Thread-safe set of open sessions, unique by client id.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    sessions: RwLock<HashMap<ClientId, Arc<ClientSession>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session.
    ///
    /// Ids are unique by construction. If one repeats anyway the newer
    /// session wins and the replaced one is closed and returned.
    pub fn register(&self, session: Arc<ClientSession>) -> Option<Arc<ClientSession>> {
        let id = session.id();
        let replaced = self.sessions.write().insert(id, session);

        if let Some(old) = &replaced {
            tracing::warn!(client_id = %id, "Duplicate session registration, replacing existing session");
            old.close();
        }
        replaced
    }

    /// Remove the session with this id, closing it.
    ///
    /// Unknown ids are a no-op: a failed send and a close detection may both
    /// try to remove the same viewer.
    pub fn deregister(&self, id: &ClientId) -> Option<Arc<ClientSession>> {
        let removed = self.sessions.write().remove(id);
        if let Some(session) = &removed {
            session.close();
        }
        removed
    }

    /// Remove exactly this session, leaving a newer session with the same
    /// id in place. The session is closed either way.
    pub fn deregister_session(&self, session: &Arc<ClientSession>) -> bool {
        let removed = {
            let mut sessions = self.sessions.write();
            match sessions.get(&session.id()) {
                Some(current) if Arc::ptr_eq(current, session) => {
                    sessions.remove(&session.id());
                    true
                }
                _ => false,
            }
        };
        session.close();
        removed
    }

    /// Point-in-time copy of the open sessions.
    pub fn snapshot(&self) -> Vec<Arc<ClientSession>> {
        self.sessions.read().values().cloned().collect()
    }

    pub fn contains(&self, id: &ClientId) -> bool {
        self.sessions.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Remove and close every session. Returns how many were removed.
    pub fn close_all(&self) -> usize {
        let drained: Vec<_> = self.sessions.write().drain().map(|(_, s)| s).collect();
        for session in &drained {
            session.close();
        }
        drained.len()
    }
}
