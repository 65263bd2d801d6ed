use axum::Json;

use crate::http::response::{HealthResponse, HEALTH_MESSAGE};

/// API health check.
#[utoipa::path(
    get,
    path = "/",
    summary = "API Health check",
    description = "Returns an object confirming the API is up",
    tag = "Default",
    responses(
        (status = 200, description = "Successful.", body = HealthResponse),
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}
