use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use parcelgeo_catalog::PropertyFacade;
use parcelgeo_core::models::PropertyId;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /display/{id} - the property image as JPEG, fetched on first access
pub async fn display_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let facade = PropertyFacade::open(&state.catalog, PropertyId::new(id)).await?;

    let path = facade.ensure_image_downloaded().await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found("Image not found").with_details(e.to_string())
        } else {
            ApiError::from(e)
        }
    })?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read cached image");
        ApiError::internal("Failed to read cached image").with_details(e.to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}
