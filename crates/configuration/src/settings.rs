use crate::error::ConfigError;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub trading: TradingConfig,
    pub quotes: QuotesConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Fills secrets that are conventionally supplied through the environment.
    pub(crate) fn apply_env_fallbacks(&mut self) {
        if self.database.url.is_none() {
            self.database.url = std::env::var("DATABASE_URL").ok();
        }
        if self.quotes.api_key.is_none() {
            self.quotes.api_key = std::env::var("API_KEY").ok();
        }
    }

    /// Rejects settings the application cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trading.starting_cash < Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "trading.starting_cash must not be negative, got {}",
                self.trading.starting_cash
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.quotes.provider == QuoteProviderKind::Http && self.quotes.api_key.is_none() {
            return Err(ConfigError::ValidationError(
                "quotes.api_key (or API_KEY) must be set for the http quote provider".to_string(),
            ));
        }
        for (symbol, entry) in &self.quotes.prices {
            if entry.price <= Decimal::ZERO {
                return Err(ConfigError::ValidationError(format!(
                    "quotes.prices.{symbol} must have a positive price"
                )));
            }
        }
        Ok(())
    }
}

/// Connection settings for PostgreSQL.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Falls back to the `DATABASE_URL` environment variable.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 5,
        }
    }
}

/// Where balances and trades are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StorageBackend {
    /// Durable storage in PostgreSQL.
    #[default]
    Postgres,
    /// Process-local storage; everything is lost on exit.
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

/// Account parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Cash credited to a newly opened account.
    pub starting_cash: Decimal,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            starting_cash: Decimal::from(10_000),
        }
    }
}

/// Which quote collaborator to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum QuoteProviderKind {
    /// Live quotes over HTTP.
    #[default]
    Http,
    /// Fixed prices from the `[quotes.prices]` table.
    Static,
}

/// A fixed quote for the static provider.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticPrice {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotesConfig {
    pub provider: QuoteProviderKind,
    pub base_url: String,
    /// Falls back to the `API_KEY` environment variable.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Keyed by symbol.
    pub prices: HashMap<String, StaticPrice>,
}

impl QuotesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            provider: QuoteProviderKind::Http,
            base_url: "https://cloud.iexapis.com/stable".to_string(),
            api_key: None,
            timeout_secs: 10,
            prices: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive such as `info` or `executor=debug,info`.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file here.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "papertrade.log".to_string(),
        }
    }
}
