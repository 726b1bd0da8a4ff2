use crate::core::{AppError, Currency, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Variable lookup used to build the config; the process environment in
/// production, a map in tests.
pub(crate) type EnvSource = dyn Fn(&str) -> Option<String>;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Currency used to format report figures
    pub report_currency: Currency,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_source(&|key: &str| env::var(key).ok())
    }

    pub(crate) fn from_source(source: &EnvSource) -> Result<Self> {
        let report_currency = match source("REPORT_CURRENCY") {
            Some(code) => Currency::from_str(&code).map_err(|_| {
                AppError::Configuration(format!("Unsupported REPORT_CURRENCY: {}", code))
            })?,
            None => Currency::default(),
        };

        let env = source("APP_ENV").unwrap_or_else(|| "development".to_string());
        // `debug` outside production unless LOG_LEVEL says otherwise
        let log_level = source("LOG_LEVEL").unwrap_or_else(|| {
            if env.eq_ignore_ascii_case("production") {
                "info".to_string()
            } else {
                "debug".to_string()
            }
        });

        Ok(Config {
            app: AppConfig {
                env,
                log_level,
                report_currency,
            },
            database: DatabaseConfig::from_source(source)?,
            server: ServerConfig::from_source(source)?,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.database.validate()?;
        self.server.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

/// Parse an optional variable, falling back to `default` when unset
pub(crate) fn parse_or<T: FromStr>(source: &EnvSource, key: &str, default: T) -> Result<T> {
    match source(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        None => Ok(default),
    }
}
