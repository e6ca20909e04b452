//! parcelgeo Store - Geometry store port and adapters
//!
//! This crate defines the `GeometryStore` port and provides a PostGIS
//! adapter and an in-memory adapter for development and tests.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use memory::MemoryGeometryStore;
pub use ports::GeometryStore;
pub use postgres::{PostgresConfig, PostgresStore};
