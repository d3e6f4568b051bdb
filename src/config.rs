//! Configuration module
//!
//! Loads `AppConfig` from a TOML file
//! (`~/.config/rental-service/config.toml` by default, overridable via
//! the `RENTAL_CONFIG` environment variable). Every section has
//! defaults so a missing file still yields a runnable dev setup.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default path of the configuration file
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rental-service")
        .join("config.toml")
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub payment: PaymentConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(toml::de::Error),
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Seconds to wait for in-flight requests during shutdown
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.host, self.api_port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            api_port: default_api_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path; ignored when `url` is set
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Full connection URL override (e.g. postgres://...)
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.path),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            url: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Payment provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    #[serde(default)]
    pub secret_key: String,
    /// Stripe webhook endpoint secret
    #[serde(default)]
    pub webhook_secret: String,
    /// Public site base URL for checkout redirects
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl PaymentConfig {
    pub fn success_url(&self) -> String {
        format!("{}/booking/success", self.base_url)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/booking/cancelled", self.base_url)
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            webhook_secret: String::new(),
            base_url: default_base_url(),
        }
    }
}

/// Booking policy settings
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Total fungible machine count
    #[serde(default = "default_total_units")]
    pub total_units: u32,
    /// Refundable security deposit in cents
    #[serde(default = "default_deposit_cents")]
    pub deposit_cents: i64,
    /// Flat delivery fee in cents
    #[serde(default = "default_delivery_fee_cents")]
    pub delivery_fee_cents: i64,
    /// Minutes before an unpaid pending reservation is reaped
    #[serde(default = "default_pending_ttl")]
    pub pending_ttl_minutes: i64,
    /// Seconds between expiry sweep runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            total_units: default_total_units(),
            deposit_cents: default_deposit_cents(),
            delivery_fee_cents: default_delivery_fee_cents(),
            pending_ttl_minutes: default_pending_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_db_path() -> String {
    "./rental.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_total_units() -> u32 {
    3
}

fn default_deposit_cents() -> i64 {
    30000
}

fn default_delivery_fee_cents() -> i64 {
    2500
}

fn default_pending_ttl() -> i64 {
    60
}

fn default_sweep_interval() -> u64 {
    300
}

// ── Tests ──────────────────────────────────────────────────────
