//! API errors
//!
//! Every variant renders as `{"error": <message>}`. Messages are generic;
//! underlying causes are logged where they happen and never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intake_forms::ErrorBody;
use thiserror::Error;

/// Errors returned by handlers
#[derive(Error, Debug)]
pub enum ApiError {
    /// Intake body was not a JSON object
    #[error("Malformed payload")]
    MalformedPayload,

    /// Record log could not be read or written
    #[error("Unable to save intake")]
    IntakePersistence,

    /// Catalog file could not be read
    #[error("Unable to load products")]
    CatalogUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MalformedPayload => StatusCode::BAD_REQUEST,
            ApiError::IntakePersistence | ApiError::CatalogUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
