//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port valid)
//! - Upstream calls must finish before the request deadline
//! - Check that every configured URL parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ServiceConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("port must be non-zero")]
    ZeroPort,
    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error(
        "upstream.timeout_secs ({upstream}) must be less than server.request_timeout_secs ({request})"
    )]
    UpstreamOutlivesRequest { upstream: u64, request: u64 },
    #[error("metrics_address is not a socket address: {0}")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    for (field, value) in [
        ("base_url", &config.base_url),
        ("upstream.url", &config.upstream.url),
    ] {
        if Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("server.request_timeout_secs"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("upstream.timeout_secs"));
    }
    let (upstream, request) = (
        config.upstream.timeout_secs,
        config.server.request_timeout_secs,
    );
    if upstream > 0 && request > 0 && upstream >= request {
        errors.push(ValidationError::UpstreamOutlivesRequest { upstream, request });
    }
    if config.events.interval().is_zero() {
        errors.push(ValidationError::ZeroDuration("events.interval_secs"));
    }
    if config.self_ping.enabled && config.self_ping.interval_secs == 0 {
        errors.push(ValidationError::ZeroDuration("self_ping.interval_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
