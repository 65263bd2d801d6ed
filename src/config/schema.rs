//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Port to listen on (all interfaces).
    pub port: u16,

    /// Public base URL, advertised in the API docs and used by self-ping.
    pub base_url: String,

    /// HTTP server settings.
    pub server: ServerConfig,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Streaming demo settings.
    pub events: EventsConfig,

    /// Self-ping keepalive settings.
    pub self_ping: SelfPingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_url: DEFAULT_BASE_URL.to_string(),
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            events: EventsConfig::default(),
            self_ping: SelfPingConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Time allowed for a handler to produce response headers, in seconds.
    pub request_timeout_secs: u64,

    /// Largest request body the decoder will buffer.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Outbound client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin called by `GET /api`.
    pub url: String,

    /// Total timeout for one outbound request, in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://httpbin.org".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Server-Sent Events demo configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Period between pushed messages, in seconds.
    pub interval_secs: u64,

    /// Sub-second override of `interval_secs`, mostly useful in tests.
    pub interval_ms: Option<u64>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            interval_ms: None,
        }
    }
}

impl EventsConfig {
    pub fn interval(&self) -> std::time::Duration {
        match self.interval_ms {
            Some(ms) => std::time::Duration::from_millis(ms),
            None => std::time::Duration::from_secs(self.interval_secs),
        }
    }
}

/// Self-ping keepalive configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelfPingConfig {
    /// Enable the periodic self-ping.
    pub enabled: bool,

    /// Ping interval in seconds.
    pub interval_secs: u64,
}

impl Default for SelfPingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 600,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
