//! Intake endpoint
//!
//! Field semantics are not checked here; the only rule enforced is the
//! server-assigned `date`.

use crate::{ApiError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use intake_forms::{IntakeAck, IntakeRecord};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Record one submission
#[utoipa::path(
    post,
    path = "/api/intake",
    request_body(
        content = HashMap<String, String>,
        description = "Form fields by name",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Submission recorded", body = IntakeAck),
        (status = 400, description = "Body is not a JSON object", body = intake_forms::ErrorBody),
        (status = 500, description = "Record log unavailable", body = intake_forms::ErrorBody)
    ),
    tag = "intake"
)]
pub async fn submit_intake(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<IntakeAck>, ApiError> {
    let request_id = Uuid::new_v4();

    let fields = match payload {
        Ok(Json(Value::Object(fields))) => fields,
        Ok(Json(other)) => {
            warn!(%request_id, "Rejected intake body of type {}", json_type(&other));
            return Err(ApiError::MalformedPayload);
        }
        Err(rejection) => {
            warn!(%request_id, "Rejected intake body: {}", rejection.body_text());
            return Err(ApiError::MalformedPayload);
        }
    };

    let record = IntakeRecord::stamp(fields, Utc::now());
    let count = state.record_log.append(record).await.map_err(|e| {
        error!(%request_id, "Unable to save intake: {}", e);
        ApiError::IntakePersistence
    })?;

    info!(%request_id, "Intake recorded ({} total)", count);
    Ok(Json(IntakeAck::ok()))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
