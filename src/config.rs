use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub supplier: SupplierSettings,
    #[serde(default)]
    pub recommendations: RecommendationSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// PostgreSQL catalog; the seeded in-memory catalog is used when `url` is unset
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: None,
            min_connections: None,
            acquire_timeout_secs: None,
            idle_timeout_secs: None,
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_run_migrations() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Shared Redis store; the in-process store is used when unset or unreachable
    pub redis_url: Option<String>,
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: u64,
    #[serde(default = "default_recommendation_ttl")]
    pub recommendation_ttl_secs: u64,
    #[serde(default = "default_supplier_ttl")]
    pub supplier_ttl_secs: u64,
    pub connection_timeout_secs: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            memory_capacity: default_memory_capacity(),
            recommendation_ttl_secs: default_recommendation_ttl(),
            supplier_ttl_secs: default_supplier_ttl(),
            connection_timeout_secs: None,
        }
    }
}

fn default_memory_capacity() -> u64 { 10_000 }
fn default_recommendation_ttl() -> u64 { 1800 }
fn default_supplier_ttl() -> u64 { 900 }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierMode {
    #[default]
    Mock,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupplierSettings {
    #[serde(default)]
    pub mode: SupplierMode,
    #[serde(default = "default_supplier_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    /// Simulated round trip of the mock supplier
    #[serde(default = "default_supplier_latency")]
    pub latency_ms: u64,
    #[serde(default = "default_supplier_timeout")]
    pub timeout_secs: u64,
}

impl Default for SupplierSettings {
    fn default() -> Self {
        Self {
            mode: SupplierMode::default(),
            base_url: default_supplier_base_url(),
            api_key: String::new(),
            latency_ms: default_supplier_latency(),
            timeout_secs: default_supplier_timeout(),
        }
    }
}

fn default_supplier_base_url() -> String { "https://test.api.amadeus.com".to_string() }
fn default_supplier_latency() -> u64 { 300 }
fn default_supplier_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_count")]
    pub default_count: u16,
    #[serde(default = "default_max_count")]
    pub max_count: u16,
    #[serde(default = "default_envelope_ttl_hours")]
    pub envelope_ttl_hours: i64,
    /// Fixed seed for the diversity jitter; random when unset
    pub diversity_seed: Option<u64>,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            max_count: default_max_count(),
            envelope_ttl_hours: default_envelope_ttl_hours(),
            diversity_seed: None,
        }
    }
}

fn default_count() -> u16 { 5 }
fn default_max_count() -> u16 { 20 }
fn default_envelope_ttl_hours() -> i64 { 24 }

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with TRAVEL__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., TRAVEL__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TRAVEL")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional DATABASE_URL, REDIS_URL and JWT_SECRET variables
/// on top of the layered configuration
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(redis_url) = env::var("REDIS_URL") {
        builder = builder.set_override("cache.redis_url", redis_url)?;
    }
    if let Ok(jwt_secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", jwt_secret)?;
    }

    builder.build()
}
