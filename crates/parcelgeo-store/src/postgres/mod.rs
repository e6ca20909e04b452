//! PostgreSQL/PostGIS storage adapter implementation

pub mod config;
pub mod migrations;
mod property;

pub use config::{ConfigError, MigrationConfig, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager, MigrationStatus};

use parcelgeo_core::error::{ParcelError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::future::Future;

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresStore {
    /// Connect with the given configuration, applying migrations first when
    /// `config.migrations.auto_run` is set
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| ParcelError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| unavailable("connect", e))?;

        let store = Self { pool, config };
        store.health_check_inner().await?;

        if store.config.migrations.auto_run {
            store.run_migrations().await?;
        }

        tracing::info!(
            max_connections = store.config.pool.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(store)
    }

    /// Run all pending migrations
    pub async fn run_migrations(&self) -> Result<()> {
        let manager = MigrationManager::new(self.pool.clone());
        manager
            .run_migrations()
            .await
            .map_err(|e| ParcelError::StoreUnavailable(format!("Migration failed: {}", e)))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Check migration status
    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        let manager = MigrationManager::new(self.pool.clone());
        manager.check_status().await.map_err(|e| {
            ParcelError::StoreUnavailable(format!("Failed to check migration status: {}", e))
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection. Later calls fail with StoreUnavailable.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }

    async fn health_check_inner(&self) -> Result<()> {
        self.timed("health_check", async {
            sqlx::query("SELECT 1").execute(&self.pool).await.map(|_| ())
        })
        .await
    }

    /// Run one store call under the configured query timeout
    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.config.query_timeout, fut).await {
            Ok(result) => result.map_err(|e| unavailable(operation, e)),
            Err(_) => {
                tracing::error!(
                    operation,
                    timeout_secs = self.config.query_timeout.as_secs_f64(),
                    "Store call timed out"
                );
                Err(ParcelError::StoreUnavailable(format!(
                    "{} timed out after {:?}",
                    operation, self.config.query_timeout
                )))
            }
        }
    }
}

fn unavailable(operation: &str, err: sqlx::Error) -> ParcelError {
    tracing::error!(operation, error = %err, "Store call failed");
    ParcelError::StoreUnavailable(format!("{} failed: {}", operation, err))
}
