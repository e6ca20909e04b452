//! parcelgeo Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the property catalogue's domain types shared by the
//! store adapters, the catalog services, and the HTTP and CLI front ends.

pub mod config;
pub mod error;
pub mod models;

pub use error::{ErrorKind, ParcelError, Result};
