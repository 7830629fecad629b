//! Server configuration module

use std::time::Duration;

use clap::Parser;
use jiff::SignedDuration;

use flashsale_app::context::AppSettings;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Flash-sale JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "flashsale-json", about = "Flash-sale JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server host address
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Server port
    #[arg(short, long, env = "SERVER_PORT", default_value = "8660")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Seconds a hold keeps stock reserved before it may expire
    #[arg(long, env = "HOLD_TTL_SECONDS", default_value_t = 120)]
    pub hold_ttl_seconds: u32,

    /// Seconds a cached product read stays fresh
    #[arg(long, env = "PRODUCT_CACHE_TTL_SECONDS", default_value_t = 300)]
    pub product_cache_ttl_seconds: u64,

    /// Seconds between expired-hold sweeps
    #[arg(long, env = "SWEEP_INTERVAL_SECONDS", default_value_t = 30)]
    pub sweep_interval_seconds: u64,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Core tunables for the checkout domain.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            hold_ttl: SignedDuration::from_secs(i64::from(self.hold_ttl_seconds)),
            product_cache_ttl: Duration::from_secs(self.product_cache_ttl_seconds),
        }
    }
}
