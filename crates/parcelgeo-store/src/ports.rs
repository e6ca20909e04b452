use async_trait::async_trait;
use parcelgeo_core::error::Result;
use parcelgeo_core::models::{Property, PropertyId, PropertyMeasurements, RadiusQuery};

/// Port for the spatially-indexed property store.
///
/// Implementations map rows to typed records at this boundary. A missing
/// record is `Ok(None)`; only backend failures are errors, and those are
/// reported as `ParcelError::StoreUnavailable`.
#[async_trait]
pub trait GeometryStore: Send + Sync {
    /// Property ids in primary-key ascending order, skipping `offset`
    async fn list_ids(&self, limit: u32, offset: u64) -> Result<Vec<PropertyId>>;

    /// Primary-key lookup
    async fn get_property(&self, id: &PropertyId) -> Result<Option<Property>>;

    /// Properties whose geocode lies within the query radius, nearest first,
    /// ties broken by id ascending
    async fn find_within(&self, query: &RadiusQuery) -> Result<Vec<Property>>;

    /// Raw metric measurements of one property, with the zone buffer drawn
    /// at `zone_radius_m` around its geocode
    async fn measure(
        &self,
        id: &PropertyId,
        zone_radius_m: f64,
    ) -> Result<Option<PropertyMeasurements>>;

    /// Round-trip check against the backend
    async fn health_check(&self) -> Result<()>;

    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;
}
