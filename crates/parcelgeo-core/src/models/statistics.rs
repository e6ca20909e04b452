use serde::{Deserialize, Serialize};

use crate::models::property::PropertyId;

/// Zone radius used when the caller does not give one
pub const DEFAULT_ZONE_SIZE_M: f64 = 10.0;

/// Raw metric measurements of one property, as computed by the geometry store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyMeasurements {
    /// Area of the parcel polygon
    pub parcel_area_sqm: f64,
    /// Area of the building footprint polygon
    pub building_area_sqm: f64,
    /// Distance from the geocode to the building footprint centroid
    pub building_distance_m: f64,
    /// Area of the disk buffer around the geocode
    pub zone_area_sqm: f64,
}

/// Derived per-property statistics, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "id")]
    pub property_id: PropertyId,
    pub parcel_area_sqm: f64,
    pub building_area_sqm: f64,
    pub building_distance_m: f64,
    pub zone_density: f64,
}

impl Statistics {
    /// Assemble statistics from store measurements.
    ///
    /// `zone_density` is the building footprint area divided by the zone
    /// buffer area.
    pub fn from_measurements(property_id: PropertyId, m: PropertyMeasurements) -> Self {
        Self {
            property_id,
            parcel_area_sqm: m.parcel_area_sqm,
            building_area_sqm: m.building_area_sqm,
            building_distance_m: m.building_distance_m,
            zone_density: m.building_area_sqm / m.zone_area_sqm,
        }
    }
}
