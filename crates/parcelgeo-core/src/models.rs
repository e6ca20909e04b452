pub mod geometry;
pub mod property;
pub mod query;
pub mod statistics;

pub use geometry::{GeoPoint, Geometry, GeometryType, ImageBounds, WGS84_SRID};
pub use property::{Property, PropertyId};
pub use query::{PageRequest, RadiusQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use statistics::{PropertyMeasurements, Statistics, DEFAULT_ZONE_SIZE_M};
