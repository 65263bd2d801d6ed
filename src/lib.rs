//! Minimal HTTP API starter service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ metrics ─▶ CORS ─▶ panic ─▶ timeout ─▶ body
//!                                                                            │
//!                                                                            ▼
//!                     ┌───────────────────────────── route match ─────────────────────────┐
//!                     │  GET /        GET /api          GET /events        GET /docs       │
//!                     │  health       demo ──▶ upstream  events ──▶ sessions  docs snapshot │
//!                     │                                                     (fallback 404) │
//!                     └────────────────────────────────────────────────────────────────────┘
//!                                                                            │
//!     Client Response                                       ApiError / panic ▼ → 500
//!     ◀──────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod events;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
