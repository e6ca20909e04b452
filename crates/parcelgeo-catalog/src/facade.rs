use parcelgeo_core::error::{ParcelError, Result};
use parcelgeo_core::models::{GeoPoint, Geometry, ImageBounds, Property, PropertyId, Statistics};
use std::path::PathBuf;

use crate::catalog::Catalog;

/// Per-property handle over the catalog.
///
/// Opening an unknown id gives an empty facade instead of an error; its
/// operations then report NotFound.
pub struct PropertyFacade {
    id: PropertyId,
    property: Option<Property>,
    catalog: Catalog,
}

impl PropertyFacade {
    /// Resolve `id` against the store. Only store failures are errors.
    pub async fn open(catalog: &Catalog, id: PropertyId) -> Result<Self> {
        let property = match catalog.repository.get_by_id(&id).await {
            Ok(property) => Some(property),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err),
        };

        Ok(Self {
            id,
            property,
            catalog: catalog.clone(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.property.is_none()
    }

    pub fn id(&self) -> &PropertyId {
        &self.id
    }

    pub fn geocode(&self) -> Option<GeoPoint> {
        self.property.as_ref().map(|p| p.geocode)
    }

    pub fn parcel_geometry(&self) -> Option<&Geometry> {
        self.property.as_ref().map(|p| &p.parcel_geometry)
    }

    pub fn building_geometry(&self) -> Option<&Geometry> {
        self.property.as_ref().map(|p| &p.building_geometry)
    }

    pub fn image_bounds(&self) -> Option<ImageBounds> {
        self.property.as_ref().map(|p| p.image_bounds)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.property.as_ref().and_then(|p| p.image_url.as_deref())
    }

    pub async fn statistics(&self, zone_radius_m: f64) -> Result<Statistics> {
        if self.is_empty() {
            return Err(ParcelError::property_not_found(self.id.as_str()));
        }
        self.catalog.statistics.compute_statistics(&self.id, zone_radius_m).await
    }

    /// Local path of the property image, downloading it on first access.
    ///
    /// NotFound when the property is unknown or has no image URL.
    pub async fn ensure_image_downloaded(&self) -> Result<PathBuf> {
        let url = self
            .image_url()
            .ok_or_else(|| ParcelError::property_not_found(self.id.as_str()))?;
        self.catalog.images.ensure(&self.id, url).await
    }
}
