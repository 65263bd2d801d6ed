//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (trace, request ID, CORS, panic, timeout, body)
//! - Serve the docs snapshot built at startup
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    http::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;
use url::Url;

use crate::config::ServiceConfig;
use crate::events::SessionRegistry;
use crate::http::error::{handle_layer_error, handle_panic};
use crate::http::middleware::{decode_body, record_metrics, BodyLimit};
use crate::http::{demo, docs, events, fallback, health};
use crate::upstream::{UpstreamClient, UpstreamError};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub upstream_url: Arc<str>,
    /// Host shown in the demo response, e.g. `httpbin.org`.
    pub upstream_host: Arc<str>,
    pub sessions: Arc<SessionRegistry>,
    pub event_interval: Duration,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Result<Self, UpstreamError> {
        let upstream_host = Url::parse(&config.upstream.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| config.upstream.url.clone());

        Ok(Self {
            upstream: UpstreamClient::new(&config.upstream)?,
            upstream_url: config.upstream.url.as_str().into(),
            upstream_host: upstream_host.into(),
            sessions: Arc::new(SessionRegistry::new()),
            event_interval: config.events.interval(),
        })
    }
}

/// HTTP server for the API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, UpstreamError> {
        let state = AppState::new(&config)?;
        let router = Self::build_router(routes(), &config, state.clone());

        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Attach the docs, fallback, and middleware stack to a set of routes.
    ///
    /// Layers added last run first, so reading bottom-up gives request order:
    /// request id, trace, metrics, CORS, panic catcher, timeout, body decoder.
    pub(crate) fn build_router(
        routes: Router<AppState>,
        config: &ServiceConfig,
        state: AppState,
    ) -> Router {
        let trace = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            })
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            );

        routes
            .merge(docs::router::<AppState>(docs::build(&config.base_url)))
            .method_not_allowed_fallback(fallback::not_found)
            .fallback(fallback::not_found)
            .with_state(state)
            .layer(from_fn_with_state(
                BodyLimit(config.server.max_body_bytes),
                decode_body,
            ))
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_layer_error))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    ))),
            )
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(CorsLayer::permissive())
            .layer(from_fn(record_metrics))
            .layer(trace)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// On shutdown every open event stream is closed so graceful shutdown
    /// is not held up by long-lived connections.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("Server running on port {}", addr.port());

        let sessions = self.state.sessions.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!(
                    open_streams = sessions.active_sessions(),
                    "Shutting down, closing event streams"
                );
                sessions.close_all();
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sessions(&self) -> Arc<SessionRegistry> {
        self.state.sessions.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Every application route, before state and middleware are attached.
pub(crate) fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health_check))
        .route("/api", get(demo::call_external))
        .route("/events", get(events::stream_events))
}
