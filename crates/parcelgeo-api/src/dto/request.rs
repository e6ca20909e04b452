use serde::Deserialize;

/// Query string of `GET /list`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub size: Option<i64>,
    pub page: Option<i64>,
}

/// Query string of `GET /statistics/{id}`
#[derive(Debug, Default, Deserialize)]
pub struct StatisticsParams {
    /// Zone radius in whole meters
    pub zone_size_m: Option<u32>,
}

/// Body of `POST /find`
#[derive(Debug, Deserialize)]
pub struct FindRequest {
    /// Search radius in meters
    pub distance: f64,
    pub location: LocationPayload,
}

/// GeoJSON-like point: `{"type": "Point", "coordinates": [lon, lat]}`
#[derive(Debug, Deserialize)]
pub struct LocationPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}
