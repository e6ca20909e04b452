use serde::{Deserialize, Serialize};

use crate::error::{ParcelError, Result};
use crate::models::geometry::GeoPoint;

/// Largest page a listing request may ask for
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Page size used when the caller does not give one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Search for properties whose geocode lies within `radius_meters` of `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusQuery {
    center: GeoPoint,
    radius_meters: f64,
}

impl RadiusQuery {
    /// Create a radius query.
    ///
    /// The radius must be finite and strictly positive; a zero or negative
    /// radius is rejected rather than treated as an empty search.
    pub fn new(center: GeoPoint, radius_meters: f64) -> Result<Self> {
        Self::validate_radius(radius_meters)?;
        center.validate()?;

        Ok(Self { center, radius_meters })
    }

    /// Check a search radius on its own, ahead of the center
    pub fn validate_radius(radius_meters: f64) -> Result<()> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(ParcelError::validation(
                "distance",
                format!("must be greater than 0, got {}", radius_meters),
            ));
        }
        Ok(())
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}

/// A validated `(size, page)` listing request, 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    size: u32,
    page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { size: DEFAULT_PAGE_SIZE, page: 1 }
    }
}

impl PageRequest {
    /// Validate raw boundary input: `size` in `[1, 1000]`, `page >= 1`
    pub fn new(size: i64, page: i64) -> Result<Self> {
        if size < 1 {
            return Err(ParcelError::validation(
                "size",
                "ensure this value is greater than or equal to 1",
            ));
        }
        if size > MAX_PAGE_SIZE as i64 {
            return Err(ParcelError::validation(
                "size",
                format!("ensure this value is less than or equal to {}", MAX_PAGE_SIZE),
            ));
        }
        if page < 1 {
            return Err(ParcelError::validation(
                "page",
                "ensure this value is greater than or equal to 1",
            ));
        }
        let page = u32::try_from(page)
            .map_err(|_| ParcelError::validation("page", format!("{} is too large", page)))?;

        Ok(Self { size: size as u32, page })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of rows skipped before this page: `size * (page - 1)`
    pub fn offset(&self) -> u64 {
        u64::from(self.size) * u64::from(self.page.saturating_sub(1))
    }
}
