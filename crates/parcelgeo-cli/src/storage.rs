use crate::cli::StorageBackend;
use anyhow::{Context, Result};
use parcelgeo_store::postgres::{PostgresConfig, PostgresStore};
use parcelgeo_store::{GeometryStore, MemoryGeometryStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Host, port and database name from a connection URL, for error messages
fn parse_database_url(url: &str) -> (String, String, String) {
    let authority = url.split('@').nth(1).and_then(|s| s.split('/').next());

    let host = authority
        .and_then(|s| s.split(':').next())
        .unwrap_or("localhost")
        .to_string();

    let port = authority
        .and_then(|s| s.split(':').nth(1))
        .unwrap_or("5432")
        .to_string();

    let database = url
        .split('/')
        .next_back()
        .and_then(|s| s.split('?').next())
        .unwrap_or("parcelgeo")
        .to_string();

    (host, port, database)
}

/// The geometry store selected on the command line
pub struct Storage {
    pub store: Arc<dyn GeometryStore>,
    postgres: Option<Arc<PostgresStore>>,
}

impl Storage {
    pub async fn new(
        backend: StorageBackend,
        fixture: Option<PathBuf>,
        query_timeout: Duration,
    ) -> Result<Self> {
        match backend {
            StorageBackend::Memory => Self::new_memory(fixture),
            StorageBackend::Postgres => {
                let store = connect_postgres(query_timeout).await?;
                let shared: Arc<dyn GeometryStore> = store.clone();
                Ok(Self {
                    store: shared,
                    postgres: Some(store),
                })
            }
        }
    }

    /// In-memory store seeded from `--fixture` or `PARCELGEO_FIXTURE`
    fn new_memory(fixture: Option<PathBuf>) -> Result<Self> {
        let fixture = fixture.or_else(|| {
            std::env::var("PARCELGEO_FIXTURE")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
        });

        let store = match fixture {
            Some(path) => MemoryGeometryStore::from_fixture_file(&path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?,
            None => {
                tracing::warn!("No fixture given; the in-memory store is empty");
                MemoryGeometryStore::new()
            }
        };

        Ok(Self {
            store: Arc::new(store),
            postgres: None,
        })
    }

    /// Release pooled database connections, if any
    pub async fn close(&self) {
        if let Some(store) = &self.postgres {
            store.close().await;
        }
    }
}

/// Connect to PostGIS using DATABASE_URL
pub async fn connect_postgres(query_timeout: Duration) -> Result<Arc<PostgresStore>> {
    let config = PostgresConfig::from_env()
        .context("Failed to load PostgreSQL configuration. Set DATABASE_URL environment variable.")?
        .with_query_timeout(query_timeout);

    let store = PostgresStore::new(config.clone()).await.map_err(|e| {
        let (host, port, database) = parse_database_url(&config.database_url);

        anyhow::anyhow!(
            "Failed to connect to PostgreSQL\n\n\
                Connection details:\n\
                  Host: {}\n\
                  Port: {}\n\
                  Database: {}\n\n\
                Remediation:\n\
                  1. Ensure PostgreSQL with PostGIS is running\n\
                  2. Check DATABASE_URL environment variable\n\
                  3. Apply the schema: parcelgeo db migrate\n\n\
                Error: {}",
            host,
            port,
            database,
            e
        )
    })?;

    Ok(Arc::new(store))
}
