//! Derived per-property statistics.
//!
//! The store measures raw metric quantities; the engine validates the zone
//! radius and derives `zone_density` from them. Nothing is cached: every
//! call reads the store again.

use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::{PropertyId, Statistics};
use parcelgeo_store::ports::GeometryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct StatisticsEngine {
    store: Arc<dyn GeometryStore>,
}

impl StatisticsEngine {
    pub fn new(store: Arc<dyn GeometryStore>) -> Self {
        Self { store }
    }

    /// Compute parcel area, building area, geocode-to-building distance and
    /// zone density for one property.
    ///
    /// `zone_radius_m` must be finite and positive; anything else is rejected
    /// before the store is touched. A zone whose measured area is not positive,
    /// or whose density comes out non-finite, is rejected as well.
    pub async fn compute_statistics(
        &self,
        id: &PropertyId,
        zone_radius_m: f64,
    ) -> Result<Statistics> {
        validate_zone_radius(zone_radius_m)?;

        let measurements = self
            .store
            .measure(id, zone_radius_m)
            .await?
            .ok_or_else(|| ParcelError::property_not_found(id.as_str()))?;

        let zone_area_sqm = measurements.zone_area_sqm;
        if zone_area_sqm.is_nan() || zone_area_sqm <= 0.0 {
            return Err(ParcelError::validation(
                "zone_size_m",
                format!("zone of radius {} m has no measurable area", zone_radius_m),
            ));
        }

        let stats = Statistics::from_measurements(id.clone(), measurements);
        if !stats.zone_density.is_finite() {
            return Err(ParcelError::validation(
                "zone_size_m",
                format!("zone of radius {} m is too small to compute a density", zone_radius_m),
            ));
        }
        tracing::info!(
            id = %id,
            zone_radius_m,
            zone_density = stats.zone_density,
            "Computed property statistics"
        );
        Ok(stats)
    }
}

/// Reject a zone radius that is not finite and strictly positive
pub fn validate_zone_radius(zone_radius_m: f64) -> Result<()> {
    if zone_radius_m.is_finite() && zone_radius_m > 0.0 {
        Ok(())
    } else {
        Err(ParcelError::validation(
            "zone_size_m",
            format!("ensure this value is greater than 0, got {}", zone_radius_m),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parcelgeo_core::models::{Property, PropertyMeasurements, RadiusQuery};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store returning fixed measurements, with the zone area following the
    /// requested radius
    #[derive(Default)]
    struct FixedStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeometryStore for FixedStore {
        async fn list_ids(&self, _limit: u32, _offset: u64) -> Result<Vec<PropertyId>> {
            Ok(vec![])
        }

        async fn get_property(&self, _id: &PropertyId) -> Result<Option<Property>> {
            Ok(None)
        }

        async fn find_within(&self, _query: &RadiusQuery) -> Result<Vec<Property>> {
            Ok(vec![])
        }

        async fn measure(
            &self,
            id: &PropertyId,
            zone_radius_m: f64,
        ) -> Result<Option<PropertyMeasurements>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id.as_str() != "f853874999424ad2a5b6f37af6b56610" {
                return Ok(None);
            }
            Ok(Some(PropertyMeasurements {
                parcel_area_sqm: 1493.818154175693,
                building_area_sqm: 728.4045420035836,
                building_distance_m: 8.69754852,
                zone_area_sqm: 3.1214451522580524 * zone_radius_m * zone_radius_m,
            }))
        }

        async fn health_check(&self) -> Result<()> {
            Ok(())
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    fn sample_id() -> PropertyId {
        PropertyId::from("f853874999424ad2a5b6f37af6b56610")
    }

    #[tokio::test]
    async fn test_density_scales_inverse_square() {
        let engine = StatisticsEngine::new(Arc::new(FixedStore::default()));

        let small = engine.compute_statistics(&sample_id(), 10.0).await.unwrap();
        let large = engine.compute_statistics(&sample_id(), 100.0).await.unwrap();

        assert_eq!(small.parcel_area_sqm, large.parcel_area_sqm);
        assert_eq!(small.building_area_sqm, large.building_area_sqm);
        assert_eq!(small.building_distance_m, large.building_distance_m);
        let ratio = small.zone_density / large.zone_density;
        assert!((ratio - 100.0).abs() < 1e-9, "ratio {}", ratio);
        assert!((small.zone_density - 2.3335).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let engine = StatisticsEngine::new(Arc::new(FixedStore::default()));
        let err = engine
            .compute_statistics(&PropertyId::from("invalid"), 10.0)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_non_positive_zone_rejected_before_store_call() {
        let store = Arc::new(FixedStore::default());
        let engine = StatisticsEngine::new(store.clone());

        for zone in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let err = engine.compute_statistics(&sample_id(), zone).await.unwrap_err();
            assert!(matches!(err, ParcelError::Validation { .. }), "zone {}", zone);
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_degenerate_zone_area_rejected() {
        let store = Arc::new(FixedStore::default());
        let engine = StatisticsEngine::new(store.clone());

        // positive radius whose squared area underflows to zero
        let err = engine.compute_statistics(&sample_id(), 1e-200).await.unwrap_err();
        assert!(matches!(err, ParcelError::Validation { .. }));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tiny_zone_with_non_finite_density_rejected() {
        let engine = StatisticsEngine::new(Arc::new(FixedStore::default()));

        // area stays positive but building_area / area overflows
        let err = engine.compute_statistics(&sample_id(), 1e-160).await.unwrap_err();
        assert!(matches!(err, ParcelError::Validation { .. }));
    }
}
