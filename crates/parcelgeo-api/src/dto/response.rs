use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    /// Backend name and whether it answered
    pub store: StoreHealth,
}

#[derive(Debug, Serialize)]
pub struct StoreHealth {
    pub backend: String,
    pub reachable: bool,
}

impl HealthResponse {
    pub fn new(backend: &str, reachable: bool) -> Self {
        Self {
            status: if reachable { "ok" } else { "degraded" }.to_string(),
            service: "parcelgeo-api".to_string(),
            store: StoreHealth {
                backend: backend.to_string(),
                reachable,
            },
        }
    }
}
