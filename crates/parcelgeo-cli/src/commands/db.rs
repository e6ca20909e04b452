//! Database management commands

use crate::cli::{DbArgs, DbCommand};
use crate::output::OutputWriter;
use crate::output_types::MigrationRow;
use crate::storage::connect_postgres;
use anyhow::{Context, Result};
use parcelgeo_core::config::LayeredConfig;
use parcelgeo_store::PostgresStore;

/// Execute database management commands against DATABASE_URL
pub async fn execute(args: DbArgs, settings: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let store = connect_postgres(settings.query_timeout()).await?;

    let result = match args.command {
        DbCommand::Status => execute_status(&store, output).await,
        DbCommand::Migrate => execute_migrate(&store, output).await,
    };

    store.close().await;
    result
}

async fn execute_status(store: &PostgresStore, output: &OutputWriter) -> Result<()> {
    let status = store
        .migration_status()
        .await
        .context("Failed to read migration status")?;

    let pending = status.iter().filter(|m| !m.applied).count();
    let rows: Vec<MigrationRow> = status
        .into_iter()
        .map(|m| MigrationRow {
            version: m.version,
            description: m.description,
            applied: m.applied,
        })
        .collect();

    output.section("Migrations");
    output.table(rows)?;

    if pending > 0 {
        output.warning(format!("{} pending migration(s). Run: parcelgeo db migrate", pending));
    }
    Ok(())
}

async fn execute_migrate(store: &PostgresStore, output: &OutputWriter) -> Result<()> {
    output.info("Applying migrations...");
    store
        .run_migrations()
        .await
        .context("Failed to apply migrations")?;
    output.success("Schema is up to date");
    Ok(())
}
