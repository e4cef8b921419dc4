use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("maptiles_requests_total", "Total number of proxy requests").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("maptiles_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("maptiles_cache_misses_total", "Total cache misses").unwrap();
    pub static ref RATE_LIMITED: Counter = register_counter!(
        "maptiles_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref UPSTREAM_ERRORS: Counter = register_counter!(
        "maptiles_upstream_errors_total",
        "Failed upstream fetches"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "maptiles_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("maptiles_cache_size", "Current number of items in cache").unwrap();
}
