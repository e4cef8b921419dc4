use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::paths::PathRejection;
use crate::upstream::UpstreamError;

/// Request-level failures, mapped onto the public status/body contract.
/// Bodies stay generic across every variant so upstream internals and
/// configuration names never reach the client.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("upstream api key is not configured")]
    MissingApiKey,

    #[error("invalid path: {0}")]
    InvalidPath(PathRejection),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                Json(serde_json::json!({"error": "Too many requests"})),
            )
                .into_response(),

            ProxyError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Internal server error"})),
            )
                .into_response(),

            ProxyError::InvalidPath(_) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Invalid request"})),
            )
                .into_response(),

            ProxyError::Upstream(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({"error": "Service unavailable"})),
            )
                .into_response(),
        }
    }
}
