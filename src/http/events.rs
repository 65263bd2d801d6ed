use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures_util::Stream;

use crate::http::server::AppState;

/// Establish an SSE connection.
///
/// Sends a confirmation frame immediately, then one JSON message per
/// interval until the client disconnects.
#[utoipa::path(
    get,
    path = "/events",
    summary = "Establish SSE connection",
    description = "This endpoint establishes a Server-Sent Events (SSE) connection and sends a message every 30 seconds.",
    tag = "Server-Sent Event",
    responses(
        (status = 200, description = "SSE connection established and data sent", content_type = "text/event-stream", body = String),
        (status = 500, description = "Server error"),
    )
)]
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let handle = state.sessions.open(state.event_interval);
    tracing::debug!(connection_id = %handle.session().id(), "Establishing SSE connection");

    Sse::new(handle.into_stream())
}
