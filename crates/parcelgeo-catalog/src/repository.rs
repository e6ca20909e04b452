use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::{PageRequest, Property, PropertyId, RadiusQuery};
use parcelgeo_store::ports::GeometryStore;
use std::sync::Arc;

/// Domain queries over the geometry store: by page, by id, by radius
#[derive(Clone)]
pub struct PropertyRepository {
    store: Arc<dyn GeometryStore>,
}

impl PropertyRepository {
    pub fn new(store: Arc<dyn GeometryStore>) -> Self {
        Self { store }
    }

    /// One page of ids in primary-key ascending order.
    ///
    /// A page with no ids, including any page past the end, is
    /// `PageNotFound` rather than an empty list.
    pub async fn list_ids(&self, page: &PageRequest) -> Result<Vec<PropertyId>> {
        let ids = self.store.list_ids(page.size(), page.offset()).await?;

        if ids.is_empty() {
            tracing::debug!(size = page.size(), page = page.page(), "Empty listing page");
            return Err(ParcelError::PageNotFound {
                size: page.size(),
                page: page.page(),
            });
        }

        Ok(ids)
    }

    pub async fn get_by_id(&self, id: &PropertyId) -> Result<Property> {
        self.store
            .get_property(id)
            .await?
            .ok_or_else(|| ParcelError::property_not_found(id.as_str()))
    }

    /// Properties within the query radius, nearest first. No match is an
    /// empty list, not an error.
    pub async fn find_within_radius(&self, query: &RadiusQuery) -> Result<Vec<Property>> {
        let properties = self.store.find_within(query).await?;
        tracing::info!(
            lon = query.center().lon,
            lat = query.center().lat,
            radius_m = query.radius_meters(),
            count = properties.len(),
            "Radius search"
        );
        Ok(properties)
    }

    pub fn store(&self) -> &Arc<dyn GeometryStore> {
        &self.store
    }
}
