//! Check command - ingest files and report validation failures.

use std::path::PathBuf;

use colored::Colorize;
use gridform::IngestSource;

use super::{display_name, load_pipeline_blocking, print_failures};
use crate::config::Settings;

pub fn run(files: Vec<PathBuf>, settings: Settings, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let sources = files
        .iter()
        .map(IngestSource::from_file)
        .collect::<Result<Vec<_>, _>>()?;

    let mut state = load_pipeline_blocking(&settings)?;
    let rows = state.ingest(&sources)?;
    let summary = state.summary();
    let check = state.check_submit();

    if json_output {
        let report = serde_json::json!({
            "files": state.sources(),
            "summary": summary,
            "rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let names: Vec<String> = files.iter().map(|f| display_name(f)).collect();
        println!("{} {}", "Checked".cyan().bold(), names.join(", ").white());
        println!();

        println!("  Rows:    {}", summary.total_rows.to_string().white().bold());
        println!("  Columns: {}", summary.total_columns);

        if !summary.validated {
            println!();
            println!("{} no schema loaded, nothing was validated", "Note:".yellow());
            return Ok(());
        }

        let failing = if summary.rows_with_errors == 0 {
            summary.rows_with_errors.to_string().green()
        } else {
            summary.rows_with_errors.to_string().red()
        };
        println!("  Failing: {} ({:.0}% valid)", failing, summary.valid_ratio() * 100.0);

        if !summary.failures_by_field.is_empty() || summary.record_level_failures > 0 {
            println!();
            println!("{}", "Failures by field:".yellow().bold());
            for (field, count) in &summary.failures_by_field {
                println!("  {:<20} {}", field, count.to_string().red());
            }
            if summary.record_level_failures > 0 {
                println!("  {:<20} {}", "(record)", summary.record_level_failures.to_string().red());
            }
            println!();
            print_failures(&rows);
        }
    }

    match check.warning {
        Some(warning) => Err(warning.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaSource;
    use gridform::{ParserConfig, ValidatorOptions};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn settings(schema: &NamedTempFile) -> Settings {
        Settings {
            schema: SchemaSource::File(schema.path().to_path_buf()),
            port: 0,
            parser: ParserConfig::default(),
            validator: ValidatorOptions::default(),
        }
    }

    fn schema_file() -> NamedTempFile {
        create_test_file(
            r#"{"type":"object","properties":{"foo":{"type":"integer"},"bar":{"type":"string","minLength":5}},"required":["foo"]}"#,
        )
    }

    #[test]
    fn test_clean_file_passes() {
        let schema = schema_file();
        let data = create_test_file("foo,bar\n12,abcdef\n");
        assert!(run(vec![data.path().to_path_buf()], settings(&schema), true).is_ok());
    }

    #[test]
    fn test_failing_rows_fail_the_command() {
        let schema = schema_file();
        let data = create_test_file("foo,bar\n12,ab\n");
        let err = run(vec![data.path().to_path_buf()], settings(&schema), true).unwrap_err();
        assert!(err.to_string().contains("1 of 1 rows"));
    }
}
