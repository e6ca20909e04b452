//! Conversions between the canonical `parcelgeo-core` geometry types and the
//! `geo` crate.

use geo::Geometry as GeoGeometry;
use wkt::ToWkt;

pub use parcelgeo_core::models::{GeoPoint, Geometry, GeometryType};

fn to_line_string(ring: &[[f64; 2]]) -> geo::LineString {
    let coords: Vec<geo::Coord> = ring.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect();
    geo::LineString::new(coords)
}

fn to_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => geo::Polygon::new(
            to_line_string(exterior),
            interiors.iter().map(|ring| to_line_string(ring)).collect(),
        ),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_polygon(coordinates)),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(geo::MultiPolygon::new(
            coordinates.iter().map(|poly| to_polygon(poly)).collect(),
        )),
    }
}

pub fn to_geo_point(point: GeoPoint) -> geo::Point {
    geo::Point::new(point.lon, point.lat)
}

/// Well-known text for a point, e.g. `POINT(-80.0782213 26.8849731)`
pub fn point_wkt(point: GeoPoint) -> String {
    to_geo_point(point).wkt_string()
}
