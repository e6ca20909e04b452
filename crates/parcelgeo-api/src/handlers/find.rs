use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use parcelgeo_core::models::{GeoPoint, Property, RadiusQuery};

use crate::dto::FindRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /find - properties within `distance` meters of a GeoJSON point
pub async fn find_properties(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FindRequest>, JsonRejection>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let Json(request) = body?;
    // distance, then geometry type, then coordinate range
    RadiusQuery::validate_radius(request.distance)?;
    if request.location.kind != "Point" {
        return Err(ApiError::bad_request("Invalid location type")
            .with_details(format!("expected Point, got {}", request.location.kind)));
    }

    let [lon, lat] = request.location.coordinates;
    let query = RadiusQuery::new(GeoPoint::new(lon, lat), request.distance)?;

    let properties = state.catalog.repository.find_within_radius(&query).await?;
    Ok(Json(properties))
}
