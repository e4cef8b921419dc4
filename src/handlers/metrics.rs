use axum::response::IntoResponse;
use prometheus::{Encoder, TextEncoder};

// metrics endpoint - prometheus text exposition
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("failed to encode metrics: {}", e);
    }

    String::from_utf8(buffer).unwrap_or_default()
}
