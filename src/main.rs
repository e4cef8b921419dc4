use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use maptiles_gateway::config::{Args, Config};
use maptiles_gateway::router;
use maptiles_gateway::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // parse cli arguments, then resolve secrets from the environment once
    let args = Args::parse();
    let config = Config::from_args(args);

    if config.api_key.is_none() {
        tracing::warn!("upstream api key is not set; proxy requests will fail with 500");
    }

    tracing::info!("forwarding to upstream at {}", config.upstream_url);
    tracing::info!(
        "rate limit: {} requests per {}s, block for {}s",
        config.rate_limit,
        config.rate_window,
        config.block_duration
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("gateway running on http://localhost:{}", port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}
