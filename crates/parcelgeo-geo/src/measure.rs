//! Metric measurements of property geometries.
//!
//! Geometries are stored in WGS 84 degrees. To measure them in meters each
//! property is projected onto a local equirectangular plane centred on its
//! geocode; areas, centroids and distances are then planar. This is accurate
//! for parcel-sized shapes and drifts for zones spanning many kilometers.

use geo::{Area, Centroid, Coord, Distance, Euclidean, MapCoords};

use crate::models::{to_geo_geometry, GeoPoint, Geometry};
use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::{Property, PropertyMeasurements};

/// Mean Earth radius in meters (IUGG)
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Segments used to approximate a disk buffer: 8 per quarter circle, the
/// PostGIS `ST_Buffer` default.
pub const BUFFER_SEGMENTS: usize = 32;

/// Equirectangular projection about a fixed origin, in meters
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin: GeoPoint,
    meters_per_degree_lon: f64,
    meters_per_degree_lat: f64,
}

impl LocalProjection {
    pub fn new(origin: GeoPoint) -> Self {
        let meters_per_degree_lat = MEAN_EARTH_RADIUS_M.to_radians();
        Self {
            origin,
            meters_per_degree_lon: meters_per_degree_lat * origin.lat.to_radians().cos(),
            meters_per_degree_lat,
        }
    }

    pub fn project_coord(&self, lon: f64, lat: f64) -> Coord {
        Coord {
            x: (lon - self.origin.lon) * self.meters_per_degree_lon,
            y: (lat - self.origin.lat) * self.meters_per_degree_lat,
        }
    }

    pub fn project(&self, geometry: &Geometry) -> geo::Geometry {
        to_geo_geometry(geometry).map_coords(|c| self.project_coord(c.x, c.y))
    }

    pub fn project_point(&self, point: GeoPoint) -> geo::Point {
        geo::Point::from(self.project_coord(point.lon, point.lat))
    }
}

/// Planar area in square meters
pub fn area(projected: &geo::Geometry) -> f64 {
    projected.unsigned_area()
}

/// Regular polygon approximating a disk of `radius` meters around `center`.
///
/// A non-positive or non-finite radius yields an empty polygon, whose area
/// is zero.
pub fn buffer_disk(center: geo::Point, radius: f64) -> geo::Polygon {
    if !radius.is_finite() || radius <= 0.0 {
        return geo::Polygon::new(geo::LineString::new(vec![]), vec![]);
    }

    let step = std::f64::consts::TAU / BUFFER_SEGMENTS as f64;
    let mut ring: Vec<Coord> = (0..BUFFER_SEGMENTS)
        .map(|i| {
            let angle = step * i as f64;
            Coord {
                x: center.x() + radius * angle.cos(),
                y: center.y() + radius * angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);

    geo::Polygon::new(geo::LineString::new(ring), vec![])
}

/// Compute the raw statistics inputs of one property.
///
/// Mirrors the PostGIS query: parcel area, building area, distance from the
/// geocode to the building centroid, and the area of the zone buffer.
pub fn measure_property(property: &Property, zone_radius_m: f64) -> Result<PropertyMeasurements> {
    let projection = LocalProjection::new(property.geocode);

    let parcel = projection.project(&property.parcel_geometry);
    let building = projection.project(&property.building_geometry);
    let geocode = projection.project_point(property.geocode);

    let centroid = building.centroid().ok_or_else(|| ParcelError::InvalidGeometry {
        id: property.id.to_string(),
        reason: "building geometry is empty".to_string(),
    })?;

    let zone = buffer_disk(geocode, zone_radius_m);

    Ok(PropertyMeasurements {
        parcel_area_sqm: area(&parcel),
        building_area_sqm: area(&building),
        building_distance_m: Euclidean.distance(geocode, centroid),
        zone_area_sqm: zone.unsigned_area(),
    })
}
