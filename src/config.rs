//! Configuration management for the Elidune ledger

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoansConfig {
    /// Default loan length applied by `borrow`
    pub duration_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub loans: LoansConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (ELIDUNE_LOANS__DURATION_DAYS, ...)
            .add_source(
                Environment::with_prefix("ELIDUNE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize a built configuration and reject unusable values
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let app_config: Self = config.try_deserialize()?;
        if app_config.loans.duration_days < 1 {
            return Err(ConfigError::Message(format!(
                "loans.duration_days must be at least 1, got {}",
                app_config.loans.duration_days
            )));
        }
        Ok(app_config)
    }
}

impl Default for LoansConfig {
    fn default() -> Self {
        Self { duration_days: 14 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
