//! Outbound HTTP client.

use std::time::Duration;

use axum::http::StatusCode;

use crate::config::UpstreamConfig;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned {status}")]
    Status { status: StatusCode, body: String },
}

impl UpstreamError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout(e)
        } else {
            UpstreamError::Transport(e)
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Thin wrapper over a pooled `reqwest::Client` with the configured timeout.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("api-starter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UpstreamError::Transport)?;

        Ok(Self { client })
    }

    /// Issue a single GET. The body is read fully before returning.
    pub async fn get(&self, url: &str) -> Result<UpstreamResponse, UpstreamError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(UpstreamError::from_reqwest)?;

        if !status.is_success() {
            return Err(UpstreamError::Status { status, body });
        }

        tracing::debug!(url = %url, status = %status, "Upstream call succeeded");
        Ok(UpstreamResponse { status, body })
    }
}
