//! Row and column handlers.

use axum::{extract::State, Json};
use gridform::{AnnotatedRow, ColumnDescriptor, EditedRow};

use crate::server::state::AppState;

/// Grid columns from the last ingestion.
pub async fn get_columns(State(state): State<AppState>) -> Json<Vec<ColumnDescriptor>> {
    let pipeline = state.pipeline.read().await;
    Json(pipeline.columns().to_vec())
}

/// Live rows with their failures.
pub async fn get_rows(State(state): State<AppState>) -> Json<Vec<AnnotatedRow>> {
    let pipeline = state.pipeline.read().await;
    Json(pipeline.annotated_rows())
}

/// Replace the live rows with the grid's full row set.
///
/// Any `error` member in the body is ignored; failures are recomputed.
pub async fn put_rows(
    State(state): State<AppState>,
    Json(rows): Json<Vec<EditedRow>>,
) -> Json<Vec<AnnotatedRow>> {
    let mut pipeline = state.pipeline.write().await;
    Json(pipeline.edit_all(rows))
}
