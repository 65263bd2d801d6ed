//! JSON response bodies shared by handlers, fallbacks, and the API docs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const HEALTH_MESSAGE: &str = "API is Live!";
pub const NOT_FOUND_MESSAGE: &str = "API route does not exist";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to call external API";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "API is Live!")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DemoResponse {
    #[schema(example = "Demo API called (httpbin.org)")]
    pub message: String,
    /// Status code returned by the upstream origin.
    #[schema(example = 200)]
    pub data: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpstreamFailure {
    #[schema(example = "Failed to call external API")]
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotFoundBody {
    pub success: bool,
    #[schema(example = "API route does not exist")]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    #[schema(example = 500)]
    pub status: u16,
    pub message: String,
}
