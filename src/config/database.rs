use crate::core::{AppError, Result};
use serde::Deserialize;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use super::{parse_or, EnvSource};

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Connections kept open while idle
    pub pool_size: u32,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub(crate) fn from_source(source: &EnvSource) -> Result<Self> {
        Ok(DatabaseConfig {
            url: source("DATABASE_URL")
                .ok_or_else(|| AppError::Configuration("DATABASE_URL not set".to_string()))?,
            pool_size: parse_or(source, "DATABASE_POOL_SIZE", 5)?,
            max_connections: parse_or(source, "DATABASE_MAX_CONNECTIONS", 10)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 || self.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database pool sizes must be greater than 0".to_string(),
            ));
        }
        if self.pool_size > self.max_connections {
            return Err(AppError::Configuration(format!(
                "DATABASE_POOL_SIZE ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                self.pool_size, self.max_connections
            )));
        }
        Ok(())
    }

    /// Create a MySQL connection pool
    pub async fn create_pool(&self) -> Result<MySqlPool> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.pool_size)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(&self.url)
            .await?;
        Ok(pool)
    }
}
