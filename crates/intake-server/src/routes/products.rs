//! Product catalog endpoint

use crate::{ApiError, AppState};
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Product catalog, verbatim
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Catalog JSON as stored"),
        (status = 500, description = "Catalog unreadable", body = intake_forms::ErrorBody)
    ),
    tag = "catalog"
)]
pub async fn list_products(State(state): State<AppState>) -> Result<Response, ApiError> {
    let data = state.catalog.load().await.map_err(|e| {
        error!("Unable to read {}: {}", state.catalog.path().display(), e);
        ApiError::CatalogUnavailable
    })?;

    Ok(([(CONTENT_TYPE, "application/json")], data).into_response())
}
