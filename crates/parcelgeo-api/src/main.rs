use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use parcelgeo_catalog::{Catalog, HttpImageSource, ImageCache};
use parcelgeo_core::config::LayeredConfig;
use parcelgeo_store::ports::GeometryStore;
use parcelgeo_store::{MemoryGeometryStore, PostgresConfig, PostgresStore};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parcelgeo_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parcelgeo_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let mut settings = LayeredConfig::with_defaults();
    if let Some(path) = &api_config.config_file {
        settings = settings
            .load_from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
    }
    let settings = settings.load_from_env();

    tracing::info!(
        port = api_config.port,
        zone_size_m = settings.zone_size_m.value,
        image_dir = %settings.image_dir.value.display(),
        "Starting parcelgeo API server"
    );

    // PostgreSQL when DATABASE_URL is set, otherwise the in-memory store
    let (store, postgres): (Arc<dyn GeometryStore>, Option<Arc<PostgresStore>>) =
        if api_config.uses_postgres() {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            let config = PostgresConfig::from_env()
                .context("Invalid PostgreSQL configuration")?
                .with_query_timeout(settings.query_timeout());
            let store = Arc::new(PostgresStore::new(config).await.context(
                "Failed to connect to PostgreSQL. Ensure it is running, DATABASE_URL is \
                 correct and the database is reachable",
            )?);
            let shared: Arc<dyn GeometryStore> = store.clone();
            (shared, Some(store))
        } else {
            let store = match &api_config.fixture {
                Some(path) => MemoryGeometryStore::from_fixture_file(path)
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?,
                None => MemoryGeometryStore::new(),
            };
            tracing::info!(
                properties = store.len(),
                "Using in-memory storage (set DATABASE_URL for PostgreSQL)"
            );
            let shared: Arc<dyn GeometryStore> = Arc::new(store);
            (shared, None)
        };

    let images = ImageCache::new(
        settings.image_dir.value.clone(),
        Arc::new(HttpImageSource::new(settings.image_timeout())?),
    );
    let state = Arc::new(AppState::new(Catalog::new(store, images), settings.zone_size_m.value));

    let cors = CorsLayer::new()
        .allow_origin(
            api_config
                .cors_origin
                .parse::<HeaderValue>()
                .context("Invalid PARCELGEO_CORS_ORIGIN")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(cors);

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(store) = postgres {
        store.close().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
