//! parcelgeo Catalog - property queries, statistics and image caching
//!
//! Everything here works against an injected `GeometryStore`, so the same
//! catalog serves the HTTP API and the CLI on either backend.

pub mod catalog;
pub mod facade;
pub mod image_cache;
pub mod repository;
pub mod statistics;

pub use catalog::Catalog;
pub use facade::PropertyFacade;
pub use image_cache::{HttpImageSource, ImageCache, ImageSource};
pub use repository::PropertyRepository;
pub use statistics::{validate_zone_radius, StatisticsEngine};
