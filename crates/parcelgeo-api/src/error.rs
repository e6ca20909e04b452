use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parcelgeo_core::error::{ErrorKind, ParcelError};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ParcelError> for ApiError {
    fn from(err: ParcelError) -> Self {
        let api_error = match (&err, err.kind()) {
            (ParcelError::PageNotFound { .. }, _) => Self::not_found("No properties found"),
            (_, ErrorKind::NotFound) => Self::not_found("Property not found"),
            (_, ErrorKind::Validation) => Self::unprocessable("Validation error"),
            (_, ErrorKind::ImageFetchFailed) => Self::not_found("Image not found"),
            (_, ErrorKind::StoreUnavailable) => {
                tracing::error!(error = %err, "Geometry store unavailable");
                Self::service_unavailable("Geometry store unavailable")
            }
            (_, ErrorKind::Internal) => {
                tracing::error!(error = %err, "Internal error");
                Self::internal("Internal error")
            }
        };
        api_error.with_details(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::unprocessable("Invalid query parameters").with_details(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                Self::new(rejection.status(), "Expected a JSON body")
                    .with_details(rejection.body_text())
            }
            _ => Self::unprocessable("Invalid request body").with_details(rejection.body_text()),
        }
    }
}
