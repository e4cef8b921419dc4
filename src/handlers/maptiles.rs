use axum::Json;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::{self, CacheEntry};
use crate::error::ProxyError;
use crate::metrics::{
    CACHE_HITS, CACHE_MISSES, CACHE_SIZE, RATE_LIMITED, REQUEST_LATENCY, REQUEST_TOTAL,
    UPSTREAM_ERRORS,
};
use crate::paths::validate_path;
use crate::rate_limit::Decision;
use crate::state::AppState;
use crate::upstream::UpstreamResponse;

#[derive(Deserialize)]
pub struct MapTilesQuery {
    pub path: Option<String>,
}

// Caller identity for rate limiting: first hop of x-forwarded-for, or
// "unknown" when the header is missing. Spoofable by design - the edge is
// trusted to set it.
fn caller_identity(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|hop| hop.trim().to_string())
        .filter(|hop| !hop.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

// proxy handler - rate limit, validate, then fetch (or serve from cache)
pub async fn maptiles_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<MapTilesQuery>,
) -> Result<Response, ProxyError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let caller = caller_identity(&headers);

    if let Decision::Blocked { retry_after_secs } =
        state.rate_limiter.admit(&caller, state.config.rate_limit)
    {
        RATE_LIMITED.inc();
        tracing::warn!(caller = %caller, "rate limit exceeded");
        return Err(ProxyError::RateLimited { retry_after_secs });
    }

    if !state.upstream.has_api_key() {
        tracing::error!("upstream api key is not configured");
        return Err(ProxyError::MissingApiKey);
    }

    let raw_path = query.path.as_deref().unwrap_or("");
    let path = match validate_path(raw_path) {
        Ok(path) => path,
        Err(reason) => {
            tracing::warn!(caller = %caller, path = %raw_path, %reason, "rejected path");
            return Err(ProxyError::InvalidPath(reason));
        }
    };

    let ttl_secs = cache::cache_duration(path);
    let cache_key = cache::make_cache_key(path);

    // serve from cache while the entry is younger than the path's ttl
    if let Some(entry) = state.cache.get(&cache_key) {
        if entry.created_at.elapsed().as_secs() < ttl_secs {
            CACHE_HITS.inc();
            let response = relay(entry.content_type.clone(), entry.body.clone(), ttl_secs);
            REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
            return Ok(response);
        }
    }
    CACHE_MISSES.inc();

    let upstream_response = match state.upstream.fetch(path).await {
        Ok(response) => response,
        Err(e) => {
            UPSTREAM_ERRORS.inc();
            tracing::error!(caller = %caller, path = %path, error = %e, "upstream fetch failed");
            return Err(ProxyError::Upstream(e));
        }
    };

    let response = match upstream_response {
        UpstreamResponse::Json(data) => {
            // cache the serialized form, relay the decoded data with fresh headers
            if let Ok(body) = serde_json::to_vec(&data) {
                store(&state, cache_key, "application/json", body);
            }
            (
                StatusCode::OK,
                [(header::CACHE_CONTROL, cache_control(ttl_secs))],
                Json(data),
            )
                .into_response()
        }
        UpstreamResponse::Binary { content_type, body } => {
            store(&state, cache_key, &content_type, body.clone());
            relay(content_type, body, ttl_secs)
        }
    };

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    Ok(response)
}

fn cache_control(ttl_secs: u64) -> String {
    format!("public, max-age={}", ttl_secs)
}

fn store(state: &AppState, key: String, content_type: &str, body: Vec<u8>) {
    state.cache.insert(
        key,
        CacheEntry {
            content_type: content_type.to_string(),
            body,
            created_at: Instant::now(),
        },
    );
    CACHE_SIZE.set(state.cache.len() as f64);
}

// relay a stored or passthrough body under the proxy's cache headers
fn relay(content_type: String, body: Vec<u8>, ttl_secs: u64) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, cache_control(ttl_secs));

    if !content_type.is_empty() {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    builder
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
