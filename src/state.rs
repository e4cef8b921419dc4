use dashmap::DashMap;
use std::time::Duration;

use crate::cache::CacheEntry;
use crate::config::Config;
use crate::rate_limit::RateLimiter;
use crate::upstream::UpstreamClient;

// app's shared state
pub struct AppState {
    pub config: Config,
    pub upstream: UpstreamClient,
    pub cache: DashMap<String, CacheEntry>, // hashed path -> CacheEntry
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let upstream = UpstreamClient::new(&config);
        let rate_limiter = RateLimiter::new(
            Duration::from_secs(config.rate_window),
            Duration::from_secs(config.block_duration),
        );

        Self {
            config,
            upstream,
            cache: DashMap::new(),
            rate_limiter,
        }
    }
}
