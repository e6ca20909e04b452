use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use parcelgeo_core::models::{PageRequest, PropertyId, DEFAULT_PAGE_SIZE};

use crate::dto::ListParams;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /list?size=&page= - one page of property ids
pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<PropertyId>>, ApiError> {
    let Query(params) = params?;
    let page = PageRequest::new(
        params.size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE)),
        params.page.unwrap_or(1),
    )?;

    tracing::info!(size = page.size(), page = page.page(), "Listing properties");

    let ids = state.catalog.repository.list_ids(&page).await?;
    Ok(Json(ids))
}
