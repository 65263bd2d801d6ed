//! Per-connection streaming session.

use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::response::sse::Event;
use futures_util::Stream;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::events::registry::SessionRegistry;

pub const CONNECTION_ESTABLISHED: &str = "Connection established";

/// Unique identifier for a streaming connection (server-generated).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Connecting = 0,
    Open = 1,
    Closed = 2,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Connecting,
            1 => SessionState::Open,
            _ => SessionState::Closed,
        }
    }
}

/// Payload pushed on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickMessage {
    pub message: String,
    pub timestamp: u64,
}

impl TickMessage {
    pub fn now() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            message: format!("Hello, World! {}", timestamp),
            timestamp,
        }
    }
}

/// A frame queued for the client, before SSE encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Connected,
    Tick(TickMessage),
}

impl Frame {
    pub fn into_event(self) -> Event {
        match self {
            Frame::Connected => Event::default().data(CONNECTION_ESTABLISHED),
            Frame::Tick(tick) => match Event::default().json_data(&tick) {
                Ok(event) => event,
                // Serializing two plain fields cannot fail; keep the text if it somehow does.
                Err(_) => Event::default().data(tick.message),
            },
        }
    }
}

/// An open streaming session: the ticker task plus its slot in the registry.
pub struct EventSession {
    id: ConnectionId,
    state: AtomicU8,
    ticker: Mutex<Option<JoinHandle<()>>>,
    registry: Weak<SessionRegistry>,
}

impl EventSession {
    pub(crate) fn new(id: ConnectionId, registry: Weak<SessionRegistry>) -> Self {
        Self {
            id,
            state: AtomicU8::new(SessionState::Connecting as u8),
            ticker: Mutex::new(None),
            registry,
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Queue the confirmation frame, then arm the recurring ticker.
    pub(crate) fn start(
        self: &Arc<Self>,
        tx: mpsc::UnboundedSender<Frame>,
        interval: Duration,
    ) {
        // Receiver is held by the caller, this cannot fail yet.
        let _ = tx.send(Frame::Connected);

        let handle = tokio::spawn(run_ticker(tx, interval, Arc::downgrade(self)));
        *self.ticker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        let _ = self.state.compare_exchange(
            SessionState::Connecting as u8,
            SessionState::Open as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Cancel the ticker and unregister. Only the first call has any effect;
    /// returns whether this call performed the close.
    pub fn close(&self) -> bool {
        if self.state.swap(SessionState::Closed as u8, Ordering::AcqRel) == SessionState::Closed as u8 {
            return false;
        }

        if let Some(handle) = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }

        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(&self.id);
        }

        tracing::debug!(connection_id = %self.id, "SSE session closed");
        true
    }
}

impl Drop for EventSession {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_ticker(
    tx: mpsc::UnboundedSender<Frame>,
    interval: Duration,
    session: Weak<EventSession>,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        // `abort` cannot interrupt a poll already in flight on another worker.
        let open = session
            .upgrade()
            .is_some_and(|session| session.state() != SessionState::Closed);
        if !open || tx.send(Frame::Tick(TickMessage::now())).is_err() {
            break;
        }
    }

    // Receiver went away without the guard closing us first.
    if let Some(session) = session.upgrade() {
        session.close();
    }
}

/// Closes the session when dropped. Lives inside the response stream so a
/// client disconnect (axum dropping the body) ends the session.
pub struct SessionGuard(Arc<EventSession>);

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// The caller's side of a freshly opened session. Dropping it closes the session.
pub struct SessionHandle {
    guard: SessionGuard,
    frames: mpsc::UnboundedReceiver<Frame>,
}

impl SessionHandle {
    pub(crate) fn new(session: Arc<EventSession>, frames: mpsc::UnboundedReceiver<Frame>) -> Self {
        Self {
            guard: SessionGuard(session),
            frames,
        }
    }

    pub fn session(&self) -> &Arc<EventSession> {
        &self.guard.0
    }

    /// Next queued frame, or `None` once the ticker has stopped.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.frames.recv().await
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
        let SessionHandle { guard, mut frames } = self;

        async_stream::stream! {
            let guard = guard;
            while let Some(frame) = frames.recv().await {
                if guard.0.state() == SessionState::Closed {
                    break;
                }
                yield Ok::<_, Infallible>(frame.into_event());
            }
        }
    }
}
