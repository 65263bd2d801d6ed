//! Server-Sent Events session subsystem.
//!
//! # Data Flow
//! ```text
//! GET /events
//!     → registry.rs (open session, assign ConnectionId)
//!     → session.rs (confirmation frame, arm ticker)
//!     → SessionHandle::into_stream (frames → sse::Event)
//!     → axum Sse response
//!
//! Client disconnect:
//!     axum drops the stream
//!     → SessionGuard::drop
//!     → EventSession::close (abort ticker, unregister)
//! ```
//!
//! # State Machine
//! ```text
//! Connecting → Open → Closed
//! ```
//!
//! # Design Decisions
//! - Each session owns its own ticker; nothing is shared between connections
//! - `close()` is idempotent, whichever side (client drop or ticker) gets there first
//! - The registry only tracks liveness, it never routes messages between sessions

pub mod registry;
pub mod session;

pub use registry::SessionRegistry;
pub use session::{ConnectionId, EventSession, Frame, SessionHandle, SessionState, TickMessage};
