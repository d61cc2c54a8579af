//! Diff command - compare an original file with its edited version.

use std::path::PathBuf;

use colored::Colorize;
use gridform::diff::LineKind;
use gridform::record::lift;
use gridform::{EditedRow, IngestSource, Parser};

use super::{display_name, load_pipeline_blocking, print_failures};
use crate::config::Settings;

pub fn run(original: PathBuf, edited: PathBuf, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = load_pipeline_blocking(&settings)?;
    state.ingest(&[IngestSource::from_file(&original)?])?;

    let parser = Parser::with_config(settings.parser.clone());
    let (table, _metadata) = parser.parse_file(&edited)?;

    // Edited rows take the id of the original row at the same position.
    let ids: Vec<_> = state.current().iter().map(|row| row.id).collect();
    let rows: Vec<EditedRow> = table
        .data
        .iter()
        .enumerate()
        .map(|(i, raw)| match ids.get(i) {
            Some(id) => EditedRow::existing(*id, lift(raw)),
            None => EditedRow::new(lift(raw)),
        })
        .collect();

    let annotated = state.edit_all(rows);
    let diff = state.diff();

    println!(
        "{} {} → {}",
        "Comparing".cyan().bold(),
        display_name(&original).white(),
        display_name(&edited).white()
    );
    println!();

    if diff.is_empty() {
        println!("{}", diff.to_string().green());
    } else {
        for line in diff.lines() {
            let text = match line.kind {
                LineKind::Row => line.text.cyan().bold(),
                LineKind::Removed => line.text.red(),
                LineKind::Added => line.text.green(),
            };
            println!("{}", text);
        }
        println!();
        println!(
            "{} modified, {} added, {} removed",
            diff.modified_count().to_string().cyan(),
            diff.added_count().to_string().green(),
            diff.removed_count().to_string().red()
        );
    }

    let check = state.check_submit();
    if let Some(warning) = &check.warning {
        println!();
        println!("{} {}", "Warning:".yellow().bold(), warning);
        print_failures(&annotated);
    }

    Ok(())
}
