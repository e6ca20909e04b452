use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::geometry::{GeoPoint, Geometry, ImageBounds};

/// Opaque primary key of a property
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id can be used verbatim as a file name stem
    pub fn is_path_safe(&self) -> bool {
        !self.0.is_empty()
            && self.0.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PropertyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A real-estate parcel as held by the geometry store.
///
/// Field names on the wire follow the store's column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    #[serde(rename = "geocode_geo")]
    pub geocode: GeoPoint,
    #[serde(rename = "parcel_geo")]
    pub parcel_geometry: Geometry,
    #[serde(rename = "building_geo")]
    pub building_geometry: Geometry,
    pub image_bounds: ImageBounds,
    pub image_url: Option<String>,
}
