//! Serve command - run the grid API.

use std::path::PathBuf;

use colored::Colorize;
use gridform::IngestSource;

use super::load_pipeline;
use crate::config::Settings;
use crate::server::{app, state::AppState};

pub fn run(files: Vec<PathBuf>, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let sources = files
        .iter()
        .map(IngestSource::from_file)
        .collect::<Result<Vec<_>, _>>()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(sources, settings))
}

async fn serve(sources: Vec<IngestSource>, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = load_pipeline(&settings).await?;
    if !sources.is_empty() {
        let rows = pipeline.ingest(&sources)?;
        println!("Loaded {} rows from {} file(s)", rows.len(), sources.len());
    }

    let url = format!("http://localhost:{}", settings.port);
    println!();
    println!("{} {}", "Starting grid server at".cyan().bold(), url.white().bold());
    if !pipeline.validation_enabled() {
        println!("{} validation disabled, no schema loaded", "Note:".yellow());
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    app::run_server(AppState::new(pipeline), settings.port).await
}
