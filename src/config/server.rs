use crate::core::{AppError, Result};
use serde::Deserialize;

use super::{parse_or, EnvSource};

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub(crate) fn from_source(source: &EnvSource) -> Result<Self> {
        Ok(Self {
            host: source("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(source, "SERVER_PORT", 8080)?,
            workers: parse_or(source, "SERVER_WORKERS", 4)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AppError::Configuration(
                "SERVER_WORKERS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
