use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    Config, DatabaseConfig, LoggingConfig, QuoteProviderKind, QuotesConfig, ServerConfig, StaticPrice,
    StorageBackend, StorageConfig, TradingConfig,
};

/// Environment variables with this prefix override file values,
/// e.g. `PAPERTRADE__TRADING__STARTING_CASH=5000`.
const ENV_PREFIX: &str = "PAPERTRADE";

/// Loads the application configuration.
///
/// Reads `.env`, then the TOML file at `path` (default `config.toml`, optional), then
/// `PAPERTRADE__*` environment overrides. Every section has defaults, so a missing file
/// yields a usable configuration.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let path = path.unwrap_or_else(|| Path::new("config.toml"));
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    finish(builder.try_deserialize::<Config>()?)
}

/// Parses configuration from an in-memory TOML document. Environment overrides are
/// not applied; the `DATABASE_URL` / `API_KEY` fallbacks are.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder.try_deserialize::<Config>()?)
}

fn finish(mut config: Config) -> Result<Config, ConfigError> {
    config.apply_env_fallbacks();
    config.validate()?;
    Ok(config)
}
