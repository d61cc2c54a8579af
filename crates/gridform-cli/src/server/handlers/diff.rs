//! Diff handler.

use axum::extract::State;

use crate::server::state::AppState;

/// Text diff of the baseline against the live rows.
pub async fn get_diff(State(state): State<AppState>) -> String {
    let pipeline = state.pipeline.read().await;
    pipeline.diff().to_string()
}
