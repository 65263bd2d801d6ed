//! Terminal error responder.
//!
//! Handlers return `Result<_, ApiError>`; this is the single place a failure
//! becomes a response. Panics are routed here too via `handle_panic`, and
//! middleware errors (the request deadline) via `handle_layer_error`.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    BoxError, Json,
};
use tower::timeout::error::Elapsed;

use crate::http::response::ErrorBody;

pub const TIMEOUT_MESSAGE: &str = "Request timed out";

pub type Result<T> = core::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request rejected before reaching a handler (e.g. malformed body).
    #[error("{0}")]
    BadRequest(String),
    /// Any other handler failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", message);
        }

        (
            status,
            Json(ErrorBody {
                success: false,
                status: status.as_u16(),
                message,
            }),
        )
            .into_response()
    }
}

/// Response for a handler that panicked. Used with `CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal Server Error".to_string()
    };

    ApiError::Internal(message).into_response()
}

/// Error handler for `HandleErrorLayer` in front of the timeout layer.
pub async fn handle_layer_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::internal(TIMEOUT_MESSAGE)
    } else {
        ApiError::internal(format!("Unhandled internal error: {err}"))
    }
}
