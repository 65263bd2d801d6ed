//! OpenAPI document and the docs UI.
//!
//! The document is assembled once from the `#[utoipa::path]` annotations on
//! each handler. A handler missing from `paths(...)` simply does not appear.

use axum::Router;
use utoipa::openapi::{server::Server, OpenApi as OpenApiDoc};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::http::response::{
    DemoResponse, ErrorBody, HealthResponse, NotFoundBody, UpstreamFailure,
};
use crate::http::{demo, events, fallback, health};

pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_PATH: &str = "/docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Starter",
        description = "A minimal HTTP API template for faster idea testing and prototyping. It contains one demo root API call, basic error handling, one demo outbound call, a Server-Sent Events stream and environment configuration.",
        contact(name = "API Starter maintainers", email = "maintainers@api-starter.dev"),
    ),
    paths(
        health::health_check,
        demo::call_external,
        events::stream_events,
        fallback::not_found,
    ),
    components(
        schemas(HealthResponse, DemoResponse, UpstreamFailure, NotFoundBody, ErrorBody)
    ),
    tags(
        (name = "Default", description = "Default API Operations that come inbuilt"),
        (name = "Server-Sent Event", description = "Long-lived server push streams"),
    )
)]
pub struct ApiDoc;

/// Build the document advertised for `base_url`.
pub fn build(base_url: &str) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(base_url)]);
    doc
}

/// RapiDoc UI at `/docs`, raw document at `/docs/openapi.json`.
pub fn router<S>(doc: OpenApiDoc) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    RapiDoc::with_openapi(OPENAPI_PATH, doc).path(DOCS_PATH).into()
}
