//! Schema and summary handlers.

use axum::{extract::State, Json};
use gridform::IngestSummary;
use serde_json::Value;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// The loaded schema document.
pub async fn get_schema(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pipeline = state.pipeline.read().await;
    match pipeline.schema() {
        Some(schema) => Ok(Json(schema.document().clone())),
        None => Err(ApiError::NotFound(
            "No schema loaded; validation is disabled".to_string(),
        )),
    }
}

/// Counts over the live rows.
pub async fn get_summary(State(state): State<AppState>) -> Json<IngestSummary> {
    let pipeline = state.pipeline.read().await;
    Json(pipeline.summary())
}
