//! Request middleware that runs in front of every route.
//!
//! The tower-http layers (trace, request id, CORS, panic, timeout) are
//! stacked in `server.rs`; this module holds the hand-written stages.

pub mod body;
pub mod metrics;

pub use body::{decode_body, BodyLimit, DecodedBody};
pub use metrics::record_metrics;
