use geo::{Distance, Haversine};

use crate::measure::MEAN_EARTH_RADIUS_M;
use crate::models::{to_geo_point, GeoPoint};

/// Great-circle distance between two points in meters
pub fn geodesic_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    Haversine.distance(to_geo_point(a), to_geo_point(b))
}

/// Degree bounding box that contains every point within `radius_m` of
/// `center`, for index pre-filtering before the exact distance test.
///
/// Returns `(min, max)` corners as `[lon, lat]`.
pub fn search_envelope(center: GeoPoint, radius_m: f64) -> ([f64; 2], [f64; 2]) {
    // Pad so that haversine rounding never drops a point on the boundary
    let radius = radius_m * 1.01;
    let dlat = (radius / MEAN_EARTH_RADIUS_M).to_degrees();

    let min_lat = (center.lat - dlat).max(-90.0);
    let max_lat = (center.lat + dlat).min(90.0);

    let max_abs_lat = min_lat.abs().max(max_lat.abs());
    let cos_lat = max_abs_lat.to_radians().cos();
    let dlon = if cos_lat <= f64::EPSILON || dlat / cos_lat >= 180.0 {
        180.0
    } else {
        dlat / cos_lat
    };

    // Near the poles or across the antimeridian, fall back to every longitude
    if dlon >= 180.0 || center.lon - dlon < -180.0 || center.lon + dlon > 180.0 {
        return ([-180.0, min_lat], [180.0, max_lat]);
    }

    ([center.lon - dlon, min_lat], [center.lon + dlon, max_lat])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_geodesic_distance_accuracy() {
        // Paris (2.3522, 48.8566) to London (-0.1276, 51.5074) ≈ 344km
        let paris = GeoPoint::new(2.3522, 48.8566);
        let london = GeoPoint::new(-0.1276, 51.5074);

        let distance = geodesic_distance(paris, london);
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_same_point_is_zero_distance() {
        let point = GeoPoint::new(-80.0782213, 26.8849731);
        assert_eq!(geodesic_distance(point, point), 0.0);
    }

    #[test]
    fn test_longitude_step_distance() {
        // 0.01 degree of longitude at ~26.9°N is roughly 990m
        let center = GeoPoint::new(-80.0782213, 26.8849731);
        let nearby = GeoPoint::new(-80.0682213, 26.8849731);

        let distance = geodesic_distance(nearby, center);
        assert!(distance > 980.0 && distance < 1_000.0, "distance {}", distance);
    }

    #[test]
    fn test_envelope_near_pole_spans_all_longitudes() {
        let (min, max) = search_envelope(GeoPoint::new(10.0, 89.99), 5_000.0);
        assert_eq!(min[0], -180.0);
        assert_eq!(max[0], 180.0);
        assert!(max[1] <= 90.0);
    }

    #[test]
    fn test_envelope_across_antimeridian_spans_all_longitudes() {
        let (min, max) = search_envelope(GeoPoint::new(179.9999, 0.0), 1_000.0);
        assert_eq!(min[0], -180.0);
        assert_eq!(max[0], 180.0);
    }

    proptest! {
        #[test]
        fn prop_envelope_contains_points_within_radius(
            lon in -170.0f64..170.0,
            lat in -80.0f64..80.0,
            bearing in 0.0f64..360.0,
            fraction in 0.0f64..1.0,
            radius in 1.0f64..20_000.0,
        ) {
            let center = GeoPoint::new(lon, lat);
            let d = (radius * fraction) / MEAN_EARTH_RADIUS_M;
            let (lat1, lon1, b) = (lat.to_radians(), lon.to_radians(), bearing.to_radians());
            let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * b.cos()).asin();
            let lon2 = lon1 + (b.sin() * d.sin() * lat1.cos()).atan2(d.cos() - lat1.sin() * lat2.sin());
            let point = GeoPoint::new(lon2.to_degrees(), lat2.to_degrees());

            let (min, max) = search_envelope(center, radius);
            prop_assert!(point.lon >= min[0] && point.lon <= max[0]);
            prop_assert!(point.lat >= min[1] && point.lat <= max[1]);
        }
    }
}
