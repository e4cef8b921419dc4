mod health;
mod maptiles;
mod metrics;

pub use health::health_handler;
pub use maptiles::maptiles_handler;
pub use metrics::metrics_handler;
