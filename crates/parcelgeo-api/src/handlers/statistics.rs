use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use parcelgeo_catalog::{validate_zone_radius, PropertyFacade};
use parcelgeo_core::models::{PropertyId, Statistics};

use crate::dto::StatisticsParams;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /statistics/{id}?zone_size_m= - derived statistics for one property
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    params: Result<Query<StatisticsParams>, QueryRejection>,
) -> Result<Json<Statistics>, ApiError> {
    let Query(params) = params?;
    let zone_size_m = params
        .zone_size_m
        .map(f64::from)
        .unwrap_or(state.default_zone_size_m);
    validate_zone_radius(zone_size_m)?;

    tracing::info!(id = %id, zone_size_m, "Computing statistics");

    let facade = PropertyFacade::open(&state.catalog, PropertyId::new(id)).await?;
    let stats = facade.statistics(zone_size_m).await?;
    Ok(Json(stats))
}
