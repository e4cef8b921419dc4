use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "maptiles-gateway")]
#[command(about = "Rate-limited caching proxy for a MapTiler-compatible tile API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Upstream tile API origin
    #[arg(short, long, default_value = "https://api.maptiler.com")]
    pub upstream_url: String,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 100)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // How long an over-limit caller stays blocked, in seconds
    #[arg(long, default_value_t = 300)]
    pub block_duration: u64,

    // Upstream request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub upstream_timeout: u64,
}

/// Runtime configuration: CLI tunables plus secrets from the environment,
/// resolved once at startup so handlers never touch the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_url: String,
    pub rate_limit: u32,
    pub rate_window: u64,
    pub block_duration: u64,
    pub upstream_timeout: u64,
    // Secret upstream key; its absence surfaces as a generic 500 at request
    // time, never as a message naming the variable
    pub api_key: Option<String>,
    // Optional Origin header value for upstream attribution
    pub origin: Option<String>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self {
            port: args.port,
            upstream_url: args.upstream_url,
            rate_limit: args.rate_limit,
            rate_window: args.rate_window,
            block_duration: args.block_duration,
            upstream_timeout: args.upstream_timeout,
            api_key: read_env("MAPTILER_API_KEY"),
            origin: read_env("GATEWAY_ORIGIN"),
        }
    }
}

// Empty values count as unset
fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
