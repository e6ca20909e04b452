//! Canonical geometry types used across all parcelgeo crates.
//!
//! Geometries travel as GeoJSON geometry objects on the wire and are
//! converted to `geo` crate types in `parcelgeo-geo` for computation.

use serde::{Deserialize, Serialize};

use crate::error::{ParcelError, Result};

/// EPSG code of WGS 84, the reference system of every stored geometry
pub const WGS84_SRID: u32 = 4326;

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    Polygon,
    MultiPolygon,
}

/// GeoJSON-compatible geometry representation
///
/// Parcels and building footprints are polygons, occasionally multipolygons
/// when a parcel is split by a road or easement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: [f64; 2],
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// Parse from a GeoJSON geometry string, as returned by `ST_AsGeoJSON`
    pub fn from_geojson_str(s: &str) -> Result<Self> {
        serde_json::from_str(s)
            .map_err(|e| ParcelError::Serialization(format!("Invalid GeoJSON geometry: {}", e)))
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// A `(longitude, latitude)` pair in WGS 84.
///
/// Serialized as a GeoJSON Point so that property records keep the same
/// shape for every geometry field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "Geometry", try_from = "Geometry")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Check that both coordinates are finite and inside WGS 84 bounds
    pub fn validate(&self) -> Result<()> {
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(ParcelError::validation(
                "location.coordinates",
                format!("longitude {} is outside [-180, 180]", self.lon),
            ));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(ParcelError::validation(
                "location.coordinates",
                format!("latitude {} is outside [-90, 90]", self.lat),
            ));
        }
        Ok(())
    }

    pub fn coordinates(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<GeoPoint> for Geometry {
    fn from(point: GeoPoint) -> Self {
        Geometry::point(point.lon, point.lat)
    }
}

impl TryFrom<Geometry> for GeoPoint {
    type Error = String;

    fn try_from(geometry: Geometry) -> std::result::Result<Self, Self::Error> {
        match geometry {
            Geometry::Point { coordinates: [lon, lat] } => Ok(GeoPoint::new(lon, lat)),
            other => Err(format!("expected Point geometry, got {:?}", other.geometry_type())),
        }
    }
}

/// Bounding box georeferencing a property's aerial image.
///
/// Serialized as `[west, south, east, north]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct ImageBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl ImageBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self { west, south, east, north }
    }

    /// Build from a database array column; exactly four values are required
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [west, south, east, north] => Ok(Self::new(*west, *south, *east, *north)),
            _ => Err(ParcelError::Serialization(format!(
                "image_bounds must have 4 values, got {}",
                values.len()
            ))),
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

impl From<[f64; 4]> for ImageBounds {
    fn from([west, south, east, north]: [f64; 4]) -> Self {
        Self::new(west, south, east, north)
    }
}

impl From<ImageBounds> for [f64; 4] {
    fn from(bounds: ImageBounds) -> Self {
        bounds.to_array()
    }
}
