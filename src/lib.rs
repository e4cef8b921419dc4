pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod paths;
pub mod rate_limit;
pub mod state;
pub mod upstream;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::state::AppState;

/// Build the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/maptiles", get(handlers::maptiles_handler))
        .with_state(state)
}
