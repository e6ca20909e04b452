use std::env;
use std::path::PathBuf;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub database_url: Option<String>,
    /// JSON fixture seeding the in-memory store when no database is set
    pub fixture: Option<PathBuf>,
    /// TOML file for the layered catalog configuration
    pub config_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("PARCELGEO_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin = env::var("PARCELGEO_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        Self {
            port,
            cors_origin,
            database_url,
            fixture: env::var("PARCELGEO_FIXTURE").ok().map(PathBuf::from),
            config_file: env::var("PARCELGEO_CONFIG").ok().map(PathBuf::from),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database_url.is_some()
    }
}
