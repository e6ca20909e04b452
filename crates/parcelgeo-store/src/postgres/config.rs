//! PostgreSQL configuration

use std::time::Duration;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// PostgreSQL connection and behavior configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Connection pool configuration
    pub pool: PoolConfig,
    /// Migration configuration
    pub migrations: MigrationConfig,
    /// Upper bound on a single store call, pool acquisition included
    pub query_timeout: Duration,
}

impl PostgresConfig {
    /// Load configuration from environment variables
    ///
    /// Requires DATABASE_URL. `PARCELGEO_DB_MAX_CONNECTIONS` and
    /// `PARCELGEO_DB_AUTO_MIGRATE` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?;

        let mut config = Self::new(database_url).map_err(|_| ConfigError::Invalid {
            key: "DATABASE_URL".to_string(),
            reason: "cannot be empty".to_string(),
        })?;

        if let Ok(value) = std::env::var("PARCELGEO_DB_MAX_CONNECTIONS") {
            config.pool.max_connections =
                value.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "PARCELGEO_DB_MAX_CONNECTIONS".to_string(),
                    reason: format!("'{}' is not a positive integer", value),
                })?;
        }

        if let Ok(value) = std::env::var("PARCELGEO_DB_AUTO_MIGRATE") {
            config.migrations.auto_run = matches!(value.trim(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// Create a new configuration with the given database URL
    pub fn new(database_url: impl Into<String>) -> Result<Self, ConfigError> {
        let database_url = database_url.into();
        if database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        Ok(Self {
            database_url,
            pool: PoolConfig::default(),
            migrations: MigrationConfig::default(),
            query_timeout: Duration::from_secs(30),
        })
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "database_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        if self.query_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "query_timeout".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        self.pool.validate()?;

        Ok(())
    }
}

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Maximum number of connections allowed
    pub max_connections: u32,
    /// Timeout for acquiring a connection from the pool
    pub acquire_timeout: Duration,
    /// Timeout for idle connections before they are closed
    pub idle_timeout: Duration,
    /// Maximum lifetime of a connection
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 1,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "pool.max_connections".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "pool.min_connections".to_string(),
                reason: format!(
                    "min_connections ({}) cannot be greater than max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

/// Migration configuration
#[derive(Debug, Clone, Default)]
pub struct MigrationConfig {
    /// Whether to apply pending migrations when the store is opened
    pub auto_run: bool,
}
