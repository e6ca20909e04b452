//! Error types for parcelgeo

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParcelError {
    // Lookup errors
    #[error("Property not found: {id}")]
    PropertyNotFound { id: String },

    #[error("No properties found for page {page} (size {size})")]
    PageNotFound { size: u32, page: u32 },

    // Input errors, raised before any store call
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    // Stored data errors
    #[error("Invalid geometry on property {id}: {reason}")]
    InvalidGeometry { id: String, reason: String },

    // Backing store errors
    #[error("Geometry store unavailable: {0}")]
    StoreUnavailable(String),

    // Image cache errors
    #[error("Failed to fetch image from {url}: {reason}")]
    ImageFetchFailed { url: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification of a [`ParcelError`], used by the HTTP and CLI
/// front ends to pick a status code or exit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    StoreUnavailable,
    ImageFetchFailed,
    Internal,
}

impl ParcelError {
    /// Shorthand for a validation failure on a named field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ParcelError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn property_not_found(id: impl Into<String>) -> Self {
        ParcelError::PropertyNotFound { id: id.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParcelError::PropertyNotFound { .. } | ParcelError::PageNotFound { .. } => {
                ErrorKind::NotFound
            }
            ParcelError::Validation { .. } => ErrorKind::Validation,
            ParcelError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            ParcelError::ImageFetchFailed { .. } => ErrorKind::ImageFetchFailed,
            ParcelError::InvalidGeometry { .. }
            | ParcelError::ConfigInvalid { .. }
            | ParcelError::Io(_)
            | ParcelError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<serde_json::Error> for ParcelError {
    fn from(err: serde_json::Error) -> Self {
        ParcelError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParcelError>;
