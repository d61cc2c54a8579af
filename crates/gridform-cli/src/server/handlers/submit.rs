//! Submit handler.

use axum::{extract::State, Json};
use gridform::SubmitCheck;

use crate::server::state::AppState;

/// Scan the live rows before the grid submits them.
pub async fn submit(State(state): State<AppState>) -> Json<SubmitCheck> {
    let pipeline = state.pipeline.read().await;
    let check = pipeline.check_submit();
    if let Some(warning) = &check.warning {
        tracing::info!(%warning, "submit requested with failing rows");
    }
    Json(check)
}
