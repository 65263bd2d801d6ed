//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics exporter → Bind listener → Spawn background tasks → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains, self-ping exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Self-ping (self_ping.rs):
//!     Periodic GET against the configured base URL (disabled by default)
//! ```
//!
//! # Design Decisions
//! - Fail fast: a bind failure is fatal, request failures never are
//! - Listener binds before background tasks start

pub mod self_ping;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
