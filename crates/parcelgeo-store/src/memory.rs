//! In-memory geometry store for development and testing.
//!
//! Records are held in a `BTreeMap` so listing is primary-key ascending, and
//! geocodes are indexed in an R-tree for radius search. The store is built
//! once and never mutated, so no locking is needed.

use async_trait::async_trait;
use parcelgeo_core::error::Result;
use parcelgeo_core::models::{Property, PropertyId, PropertyMeasurements, RadiusQuery};
use parcelgeo_geo::{geodesic_distance, measure_property, search_envelope};
use rstar::primitives::GeomWithData;
use rstar::{RTree, AABB};
use std::collections::BTreeMap;
use std::path::Path;

use crate::ports::GeometryStore;

type IndexedPoint = GeomWithData<[f64; 2], PropertyId>;

/// In-memory implementation of GeometryStore
#[derive(Debug, Default)]
pub struct MemoryGeometryStore {
    properties: BTreeMap<PropertyId, Property>,
    index: RTree<IndexedPoint>,
}

impl MemoryGeometryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a set of records. A repeated id keeps the last record.
    pub fn from_properties(properties: impl IntoIterator<Item = Property>) -> Self {
        let mut by_id = BTreeMap::new();
        for property in properties {
            if let Some(previous) = by_id.insert(property.id.clone(), property) {
                tracing::warn!(id = %previous.id, "Duplicate property id, keeping the last record");
            }
        }

        let points = by_id
            .values()
            .map(|p| GeomWithData::new(p.geocode.coordinates(), p.id.clone()))
            .collect();

        Self {
            properties: by_id,
            index: RTree::bulk_load(points),
        }
    }

    /// Load a JSON fixture: an array of property records in wire format
    pub fn from_fixture_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_fixture_str(&content)?;
        tracing::info!(path = %path.display(), count = store.len(), "Loaded property fixture");
        Ok(store)
    }

    pub fn from_fixture_str(json: &str) -> Result<Self> {
        let properties: Vec<Property> = serde_json::from_str(json)?;
        for property in &properties {
            property.geocode.validate()?;
        }
        Ok(Self::from_properties(properties))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[async_trait]
impl GeometryStore for MemoryGeometryStore {
    async fn list_ids(&self, limit: u32, offset: u64) -> Result<Vec<PropertyId>> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(self.properties.keys().skip(skip).take(limit as usize).cloned().collect())
    }

    async fn get_property(&self, id: &PropertyId) -> Result<Option<Property>> {
        Ok(self.properties.get(id).cloned())
    }

    async fn find_within(&self, query: &RadiusQuery) -> Result<Vec<Property>> {
        let center = query.center();
        let (min, max) = search_envelope(center, query.radius_meters());

        let mut hits: Vec<(f64, &Property)> = self
            .index
            .locate_in_envelope(&AABB::from_corners(min, max))
            .filter_map(|entry| self.properties.get(&entry.data))
            .map(|property| (geodesic_distance(property.geocode, center), property))
            .filter(|(distance, _)| *distance <= query.radius_meters())
            .collect();

        hits.sort_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));

        Ok(hits.into_iter().map(|(_, property)| property.clone()).collect())
    }

    async fn measure(
        &self,
        id: &PropertyId,
        zone_radius_m: f64,
    ) -> Result<Option<PropertyMeasurements>> {
        self.properties
            .get(id)
            .map(|property| measure_property(property, zone_radius_m))
            .transpose()
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
