use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::response::{DemoResponse, UpstreamFailure, UPSTREAM_FAILURE_MESSAGE};
use crate::http::server::AppState;

/// Call the configured upstream once and relay its status code.
///
/// Upstream failures are handled here rather than by the error responder:
/// the caller gets a fixed message, the cause only goes to the log.
#[utoipa::path(
    get,
    path = "/api",
    summary = "Call a demo external API (httpbin.org)",
    description = "Returns an object containing the upstream status code",
    tag = "Default",
    responses(
        (status = 200, description = "Successful.", body = DemoResponse),
        (status = 500, description = "The external API could not be reached.", body = UpstreamFailure),
    )
)]
pub async fn call_external(State(state): State<AppState>) -> Response {
    match state.upstream.get(&state.upstream_url).await {
        Ok(response) => Json(DemoResponse {
            message: format!("Demo API called ({})", state.upstream_host),
            data: response.status.as_u16(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(url = %state.upstream_url, error = %e, "Error calling external API");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UpstreamFailure {
                    error: UPSTREAM_FAILURE_MESSAGE.to_string(),
                }),
            )
                .into_response()
        }
    }
}
