//! Registry of live streaming sessions.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::events::session::{ConnectionId, EventSession, SessionHandle};
use crate::observability::metrics;

/// Tracks every open session by connection id.
///
/// Each entry owns exactly one ticker task, so `active_sessions()` is also
/// the number of outstanding timers.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<ConnectionId, Arc<EventSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Open a session that ticks every `interval`.
    ///
    /// The confirmation frame is already queued when this returns.
    pub fn open(self: &Arc<Self>, interval: Duration) -> SessionHandle {
        let id = ConnectionId::new();
        let session = Arc::new(EventSession::new(id.clone(), Arc::downgrade(self)));
        let (tx, rx) = mpsc::unbounded_channel();

        self.sessions.insert(id.clone(), session.clone());
        session.start(tx, interval);

        let active = self.active_sessions();
        metrics::set_active_sessions(active);
        tracing::debug!(connection_id = %id, active, "SSE session opened");

        SessionHandle::new(session, rx)
    }

    pub(crate) fn unregister(&self, id: &ConnectionId) {
        if self.sessions.remove(id).is_some() {
            metrics::set_active_sessions(self.active_sessions());
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Close every open session. Used on shutdown.
    pub fn close_all(&self) {
        let open: Vec<Arc<EventSession>> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();

        for session in open {
            session.close();
        }
    }
}
