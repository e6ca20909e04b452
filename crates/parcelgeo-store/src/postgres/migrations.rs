use sqlx::migrate::Migrator;
use sqlx::PgPool;
use std::collections::HashSet;
use thiserror::Error;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Migration error types
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Failed(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// Applies and inspects the schema migrations embedded in this crate
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply all pending migrations in version order
    pub async fn run_migrations(&self) -> Result<(), MigrationError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Status of every embedded migration
    pub async fn check_status(&self) -> Result<Vec<MigrationStatus>, MigrationError> {
        let applied = self.applied_versions().await?;

        Ok(MIGRATOR
            .iter()
            .map(|migration| MigrationStatus {
                version: migration.version,
                description: migration.description.to_string(),
                applied: applied.contains(&migration.version),
            })
            .collect())
    }

    async fn applied_versions(&self) -> Result<HashSet<i64>, MigrationError> {
        // The tracking table only exists once a migration has run
        let exists: bool =
            sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Ok(HashSet::new());
        }

        let versions: Vec<i64> = sqlx::query_scalar(
            "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(versions.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert!(!versions.is_empty());
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_properties_migration_is_embedded() {
        assert!(MIGRATOR
            .iter()
            .any(|m| m.sql.contains("CREATE TABLE IF NOT EXISTS properties")));
    }
}
