//! The ingest → coerce → validate → attach pipeline and the edit loop.

mod edit;
mod ingest;
mod state;
mod submit;
mod summary;

pub use edit::{edit_all, EditOutput, EditedRow};
pub use ingest::{ingest, IngestOutput, IngestSource};
pub use state::{PipelineConfig, PipelineState};
pub use submit::{check_submit, SubmitCheck};
pub use summary::IngestSummary;
