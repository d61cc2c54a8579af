//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use gridform::PipelineState;

/// Shared application state.
///
/// Mutating handlers hold the write lock for the whole pass, so ingestion
/// and edit passes never interleave.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RwLock<PipelineState>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(pipeline: PipelineState) -> Self {
        Self {
            pipeline: Arc::new(RwLock::new(pipeline)),
        }
    }
}
