//! File ingestion handler.

use axum::{
    extract::{Query, State},
    Json,
};
use gridform::{AnnotatedRow, ColumnDescriptor};
use serde::{Deserialize, Serialize};

use crate::server::error::ApiError;
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IngestParams {
    /// Name of the dropped file.
    pub name: Option<String>,
}

/// Response for the ingest endpoint.
#[derive(Serialize)]
pub struct IngestResponse {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<AnnotatedRow>,
}

/// Ingest a dropped file sent as the raw request body.
pub async fn ingest_file(
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
    body: String,
) -> Result<Json<IngestResponse>, ApiError> {
    let name = params.name.unwrap_or_else(|| "upload".to_string());
    let mut pipeline = state.pipeline.write().await;
    let rows = pipeline.ingest_text(&name, &body)?;

    Ok(Json(IngestResponse {
        columns: pipeline.columns().to_vec(),
        rows,
    }))
}
