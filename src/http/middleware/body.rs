//! Body decoder.
//!
//! Buffers JSON and URL-encoded bodies and checks they parse before any
//! handler runs. The parsed value is left in request extensions as
//! `DecodedBody`; the raw bytes are put back so extractors still work.
//! Other content types pass through untouched.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::ApiError;

/// Maximum number of body bytes the decoder will buffer.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(headers: &HeaderMap) -> Option<BodyKind> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if essence == "application/json" || essence.ends_with("+json") {
        Some(BodyKind::Json)
    } else if essence == "application/x-www-form-urlencoded" {
        Some(BodyKind::Form)
    } else {
        None
    }
}

fn decode(kind: BodyKind, bytes: &Bytes) -> Result<DecodedBody, ApiError> {
    match kind {
        BodyKind::Json => serde_json::from_slice(bytes)
            .map(DecodedBody::Json)
            .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {}", e))),
        BodyKind::Form => {
            std::str::from_utf8(bytes).map_err(|_| {
                ApiError::BadRequest("Malformed URL-encoded body: not valid UTF-8".to_string())
            })?;
            let pairs = url::form_urlencoded::parse(bytes)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            Ok(DecodedBody::Form(pairs))
        }
    }
}

pub async fn decode_body(
    State(BodyLimit(limit)): State<BodyLimit>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(kind) = body_kind(request.headers()) else {
        return next.run(request).await;
    };

    let (mut parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ApiError::BadRequest(format!("Failed to read request body: {}", e))
                .into_response();
        }
    };

    // Empty bodies are treated as absent, whatever the content type claims.
    if !bytes.is_empty() {
        match decode(kind, &bytes) {
            Ok(decoded) => {
                parts.extensions.insert(decoded);
            }
            Err(e) => return e.into_response(),
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::post,
        Extension, Router,
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn echo(decoded: Option<Extension<DecodedBody>>, body: Bytes) -> String {
        match decoded {
            Some(Extension(DecodedBody::Json(v))) => format!("json:{}", v),
            Some(Extension(DecodedBody::Form(pairs))) => format!("form:{:?}|{}", pairs, body.len()),
            None => format!("raw:{}", body.len()),
        }
    }

    fn app(limit: usize) -> Router {
        Router::new()
            .route("/", post(echo))
            .layer(from_fn_with_state(BodyLimit(limit), decode_body))
    }

    async fn send(limit: usize, content_type: &str, body: &'static str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app(limit).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_body_kind_detection() {
        let mut headers = HeaderMap::new();
        assert_eq!(body_kind(&headers), None);

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        assert_eq!(body_kind(&headers), Some(BodyKind::Json));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/merge-patch+json"));
        assert_eq!(body_kind(&headers), Some(BodyKind::Json));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("Application/X-WWW-Form-Urlencoded"));
        assert_eq!(body_kind(&headers), Some(BodyKind::Form));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(body_kind(&headers), None);
    }

    #[tokio::test]
    async fn test_json_body_is_decoded() {
        let (status, body) = send(1024, "application/json", r#"{"a":1}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!("json:{}", json!({"a": 1})));
    }

    #[tokio::test]
    async fn test_form_body_is_decoded_and_restored() {
        let (status, body) = send(1024, "application/x-www-form-urlencoded", "a=1&b=two+words").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            r#"form:[("a", "1"), ("b", "two words")]|15"#
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (status, body) = send(1024, "application/json", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 400);
        assert!(body["message"].as_str().unwrap().starts_with("Malformed JSON body"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let (status, _) = send(4, "application/json", r#"{"a":1}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_content_types_pass_through() {
        let (status, body) = send(4, "text/plain", "not checked at all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "raw:18");
    }

    #[tokio::test]
    async fn test_empty_json_body_passes() {
        let (status, body) = send(1024, "application/json", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "raw:0");
    }
}
