use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// GET /health - liveness plus a store round trip
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.catalog.store();

    match store.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new(store.backend(), true))),
        Err(e) => {
            tracing::warn!(error = %e, backend = store.backend(), "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::new(store.backend(), false)),
            )
        }
    }
}
