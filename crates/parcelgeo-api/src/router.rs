use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Properties
        .route("/list", get(handlers::list_properties))
        .route("/statistics/{id}", get(handlers::get_statistics))
        .route("/display/{id}", get(handlers::display_image))
        .route("/find", post(handlers::find_properties))

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
