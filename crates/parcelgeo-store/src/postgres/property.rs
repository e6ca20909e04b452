use async_trait::async_trait;
use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::{
    GeoPoint, Geometry, ImageBounds, Property, PropertyId, PropertyMeasurements, RadiusQuery,
    WGS84_SRID,
};
use parcelgeo_geo::models::point_wkt;

use super::PostgresStore;
use crate::ports::GeometryStore;

const PROPERTY_COLUMNS: &str = r#"
    id,
    ST_AsGeoJSON(geocode_geo, 15) AS geocode_geo,
    ST_AsGeoJSON(parcel_geo, 15) AS parcel_geo,
    ST_AsGeoJSON(building_geo, 15) AS building_geo,
    image_bounds,
    image_url
"#;

/// One `properties` row with geometries rendered as GeoJSON
#[derive(Debug, sqlx::FromRow)]
struct PropertyRow {
    id: String,
    geocode_geo: String,
    parcel_geo: String,
    building_geo: String,
    image_bounds: Vec<f64>,
    image_url: Option<String>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = ParcelError;

    fn try_from(row: PropertyRow) -> Result<Self> {
        let invalid = |reason: String| ParcelError::InvalidGeometry {
            id: row.id.clone(),
            reason,
        };

        let geocode = GeoPoint::try_from(Geometry::from_geojson_str(&row.geocode_geo)?)
            .map_err(invalid)?;
        let parcel_geometry = Geometry::from_geojson_str(&row.parcel_geo)?;
        let building_geometry = Geometry::from_geojson_str(&row.building_geo)?;
        let image_bounds = ImageBounds::from_slice(&row.image_bounds)?;

        Ok(Property {
            id: PropertyId(row.id),
            geocode,
            parcel_geometry,
            building_geometry,
            image_bounds,
            image_url: row.image_url,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MeasurementRow {
    parcel_area: f64,
    building_area: f64,
    building_distance: f64,
    zone_area: f64,
}

impl From<MeasurementRow> for PropertyMeasurements {
    fn from(row: MeasurementRow) -> Self {
        PropertyMeasurements {
            parcel_area_sqm: row.parcel_area,
            building_area_sqm: row.building_area,
            building_distance_m: row.building_distance,
            zone_area_sqm: row.zone_area,
        }
    }
}

#[async_trait]
impl GeometryStore for PostgresStore {
    async fn list_ids(&self, limit: u32, offset: u64) -> Result<Vec<PropertyId>> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let ids: Vec<String> = self
            .timed(
                "list_ids",
                sqlx::query_scalar("SELECT id FROM properties ORDER BY id LIMIT $1 OFFSET $2")
                    .bind(i64::from(limit))
                    .bind(offset)
                    .fetch_all(self.pool()),
            )
            .await?;

        tracing::debug!(limit, offset, count = ids.len(), "Listed property ids");
        Ok(ids.into_iter().map(PropertyId).collect())
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Option<Property>> {
        let sql = format!("SELECT {} FROM properties WHERE id = $1", PROPERTY_COLUMNS);

        let row: Option<PropertyRow> = self
            .timed(
                "get_property",
                sqlx::query_as(&sql).bind(id.as_str()).fetch_optional(self.pool()),
            )
            .await?;

        row.map(Property::try_from).transpose()
    }

    async fn find_within(&self, query: &RadiusQuery) -> Result<Vec<Property>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM properties
            WHERE ST_DWithin(geocode_geo, ST_GeomFromText($1, $3)::geography, $2)
            ORDER BY ST_Distance(geocode_geo, ST_GeomFromText($1, $3)::geography), id
            "#,
            PROPERTY_COLUMNS
        );

        let rows: Vec<PropertyRow> = self
            .timed(
                "find_within",
                sqlx::query_as(&sql)
                    .bind(point_wkt(query.center()))
                    .bind(query.radius_meters())
                    .bind(WGS84_SRID as i32)
                    .fetch_all(self.pool()),
            )
            .await?;

        tracing::debug!(
            radius_m = query.radius_meters(),
            count = rows.len(),
            "Radius search complete"
        );
        rows.into_iter().map(Property::try_from).collect()
    }

    async fn measure(
        &self,
        id: &PropertyId,
        zone_radius_m: f64,
    ) -> Result<Option<PropertyMeasurements>> {
        let row: Option<MeasurementRow> = self
            .timed(
                "measure",
                sqlx::query_as(
                    r#"
                    SELECT
                        ST_Area(parcel_geo) AS parcel_area,
                        ST_Area(building_geo) AS building_area,
                        ST_Distance(geocode_geo, ST_Centroid(building_geo)) AS building_distance,
                        ST_Area(ST_Buffer(geocode_geo, $2::float8)) AS zone_area
                    FROM properties
                    WHERE id = $1
                    "#,
                )
                .bind(id.as_str())
                .bind(zone_radius_m)
                .fetch_optional(self.pool()),
            )
            .await?;

        Ok(row.map(PropertyMeasurements::from))
    }

    async fn health_check(&self) -> Result<()> {
        self.health_check_inner().await
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PropertyRow {
        PropertyRow {
            id: "3290ec7dd190478aab124f6f2f32bdd7".to_string(),
            geocode_geo: r#"{"type":"Point","coordinates":[-80.0782213,26.8849731]}"#.to_string(),
            parcel_geo: r#"{"type":"Polygon","coordinates":[[[-80.0783,26.8849],[-80.0781,26.8849],[-80.0781,26.8851],[-80.0783,26.8849]]]}"#.to_string(),
            building_geo: r#"{"type":"Polygon","coordinates":[[[-80.0782,26.8849],[-80.0781,26.8849],[-80.0781,26.8850],[-80.0782,26.8849]]]}"#.to_string(),
            image_bounds: vec![-80.0785, 26.8847, -80.0779, 26.8852],
            image_url: Some("https://storage.example.com/3290ec7d.tif".to_string()),
        }
    }

    #[test]
    fn test_geojson_keeps_full_coordinate_precision() {
        for column in ["geocode_geo", "parcel_geo", "building_geo"] {
            let expr = format!("ST_AsGeoJSON({}, 15) AS {}", column, column);
            assert!(PROPERTY_COLUMNS.contains(&expr), "{}", column);
        }
    }

    #[test]
    fn test_row_maps_to_property() {
        let property = Property::try_from(row()).unwrap();
        assert_eq!(property.id.as_str(), "3290ec7dd190478aab124f6f2f32bdd7");
        assert_eq!(property.geocode, GeoPoint::new(-80.0782213, 26.8849731));
        assert_eq!(property.image_bounds.west, -80.0785);
        assert!(property.image_url.is_some());
    }

    #[test]
    fn test_non_point_geocode_is_invalid_geometry() {
        let mut bad = row();
        bad.geocode_geo = bad.parcel_geo.clone();
        match Property::try_from(bad) {
            Err(ParcelError::InvalidGeometry { id, .. }) => {
                assert_eq!(id, "3290ec7dd190478aab124f6f2f32bdd7")
            }
            other => panic!("Expected InvalidGeometry, got {:?}", other),
        }
    }

    #[test]
    fn test_short_image_bounds_rejected() {
        let mut bad = row();
        bad.image_bounds = vec![1.0, 2.0];
        assert!(Property::try_from(bad).is_err());
    }
}
