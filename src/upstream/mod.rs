//! Outbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api handler, self-ping task
//!     → client.rs (single GET, configurable timeout)
//!     → UpstreamResponse { status, body } | UpstreamError
//! ```
//!
//! # Design Decisions
//! - One attempt per call, no retries
//! - Non-2xx statuses are errors, like a transport failure
//! - Every call has a deadline taken from config

pub mod client;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
