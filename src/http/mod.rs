//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware/ (metrics, body decoder)
//!     → route handler (health.rs, demo.rs, events.rs)
//!       or fallback.rs (404)
//!     → error.rs (ApiError / panic → structured 500)
//!     → Send to client
//! ```

pub mod demo;
pub mod docs;
pub mod error;
pub mod events;
pub mod fallback;
pub mod health;
pub mod middleware;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer, X_REQUEST_ID};
