use axum::{http::StatusCode, Json};

use crate::http::response::{NotFoundBody, NOT_FOUND_MESSAGE};

/// Fallback for any unmatched method or path.
#[utoipa::path(
    get,
    path = "/obviously/this/route/cant/exist",
    summary = "API 404 Response",
    description = "Returns a non-crashing result when you try to run a route that doesn't exist",
    tag = "Default",
    responses(
        (status = 404, description = "Route not found", body = NotFoundBody),
    )
)]
pub async fn not_found() -> (StatusCode, Json<NotFoundBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            success: false,
            message: NOT_FOUND_MESSAGE.to_string(),
        }),
    )
}
