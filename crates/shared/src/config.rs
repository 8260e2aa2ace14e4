//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Per-client rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// How many times to try connecting before giving up.
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    /// Delay between connection attempts in seconds.
    #[serde(default = "default_connect_retry_delay")]
    pub connect_retry_delay_secs: u64,
}

impl DatabaseConfig {
    /// Creates a configuration for `url` with default pool and retry settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_attempts: default_connect_attempts(),
            connect_retry_delay_secs: default_connect_retry_delay(),
        }
    }

    /// Returns the delay between connection attempts.
    #[must_use]
    pub const fn connect_retry_delay(&self) -> Duration {
        Duration::from_secs(self.connect_retry_delay_secs)
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_attempts() -> u32 {
    5
}

fn default_connect_retry_delay() -> u64 {
    2
}

/// Token bucket settings applied to every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RateLimitConfig {
    /// Bucket capacity (maximum burst).
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Tokens restored per second, capped at one per nanosecond.
    #[serde(default = "default_refill_per_second")]
    pub refill_per_second: u32,
    /// Seconds after creation at which a client's bucket is dropped.
    #[serde(default = "default_idle_eviction")]
    pub idle_eviction_secs: u64,
}

impl RateLimitConfig {
    /// Returns the eviction window as a `Duration`.
    #[must_use]
    pub const fn idle_eviction(&self) -> Duration {
        Duration::from_secs(self.idle_eviction_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: default_burst(),
            refill_per_second: default_refill_per_second(),
            idle_eviction_secs: default_idle_eviction(),
        }
    }
}

fn default_burst() -> u32 {
    5
}

fn default_refill_per_second() -> u32 {
    1
}

fn default_idle_eviction() -> u64 {
    600 // 10 minutes
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("SWIFTREG")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
