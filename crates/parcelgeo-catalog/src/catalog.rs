use parcelgeo_store::ports::GeometryStore;
use std::sync::Arc;

use crate::image_cache::ImageCache;
use crate::repository::PropertyRepository;
use crate::statistics::StatisticsEngine;

/// The property catalog: repository, statistics engine and image cache
/// sharing one geometry store
#[derive(Clone)]
pub struct Catalog {
    pub repository: PropertyRepository,
    pub statistics: StatisticsEngine,
    pub images: ImageCache,
}

impl Catalog {
    pub fn new(store: Arc<dyn GeometryStore>, images: ImageCache) -> Self {
        Self {
            repository: PropertyRepository::new(store.clone()),
            statistics: StatisticsEngine::new(store),
            images,
        }
    }

    pub fn store(&self) -> &Arc<dyn GeometryStore> {
        self.repository.store()
    }
}
