//! Startup orchestration.
//!
//! # Responsibilities
//! - Install the metrics exporter when enabled
//! - Bind the listener (the only fatal step)
//! - Start the self-ping task
//! - Serve until a shutdown signal, then drain

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::self_ping::SelfPing;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] UpstreamError),
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the service until Ctrl+C / SIGTERM.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;

    let self_ping = SelfPing::new(
        server.state().upstream.clone(),
        &server.config().base_url,
        server.config().self_ping.clone(),
    );
    tokio::spawn(self_ping.run(shutdown.subscribe()));

    let serve = server.run(listener, shutdown.subscribe());
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return result.map_err(StartupError::Serve),
        _ = shutdown_signal() => shutdown.trigger(),
    }

    serve.await.map_err(StartupError::Serve)
}
