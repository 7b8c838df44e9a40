//! Health check endpoint

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

/// Health report
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the record log is unreadable
    pub status: String,
    /// Server version
    pub version: String,
    /// Current server time
    pub timestamp: String,
    /// Records in the intake log, when readable
    pub records: Option<usize>,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let records = match state.record_log.read_all().await {
        Ok(records) => Some(records.len()),
        Err(e) => {
            warn!("Record log unreadable: {}", e);
            None
        }
    };

    let status = if records.is_some() { "healthy" } else { "degraded" };
    Json(HealthResponse {
        status: status.into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        records,
    })
}
