//! parcelgeo Geo - Geometry conversion and metric primitives
//!
//! This crate turns stored WGS 84 geometries into `geo` types and provides the
//! area, centroid, distance, buffer and search-envelope primitives that the
//! in-memory geometry store uses in place of PostGIS.

pub mod measure;
pub mod models;
pub mod spatial;

pub use measure::{measure_property, LocalProjection, BUFFER_SEGMENTS};
pub use spatial::{geodesic_distance, search_envelope};
