//! Integration tests for the gridform pipeline.

use std::io::Write;
use tempfile::NamedTempFile;

use gridform::{EditedRow, FormSchema, GridformError, IngestSource, PipelineState, RowId};
use serde_json::json;

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// The schema served by the forms endpoint.
fn forms_schema() -> FormSchema {
    FormSchema::from_json_str(
        r#"{
            "data": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "foo": { "type": "integer" },
                        "bar": { "type": "string", "minLength": 5 }
                    },
                    "required": ["foo"],
                    "additionalProperties": false
                }
            }
        }"#,
    )
    .expect("Schema should load")
}

fn pipeline() -> PipelineState {
    let mut state = PipelineState::new();
    state.set_schema(forms_schema()).expect("Schema should compile");
    state
}

// =============================================================================
// Ingestion
// =============================================================================

#[test]
fn test_short_bar_is_flagged_on_ingest() {
    let file = create_test_file("foo,bar\n12,ab\n");
    let source = IngestSource::from_file(file.path()).expect("Read failed");

    let mut state = pipeline();
    let rows = state.ingest(&[source]).expect("Ingest failed");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values["foo"], json!(12));
    assert_eq!(rows[0].values["bar"], json!("ab"));
    assert_eq!(rows[0].error.len(), 1);
    assert_eq!(rows[0].error[0].instance_path, "/bar");
    assert_eq!(rows[0].error[0].keyword, "minLength");

    let check = state.check_submit();
    assert_eq!(check.rows_with_errors, 1);
    assert!(check.warning.is_some());
}

#[test]
fn test_tsv_and_blank_lines() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.tsv", "foo\tbar\n1\tabcdef\n\n   \n2\tabcdefg\n")
        .expect("Ingest failed");

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.is_valid()));
    assert_eq!(state.sources()[0].format, "tsv");
}

#[test]
fn test_unparsable_integer_stays_text_and_fails() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.csv", "foo,bar\ntwelve,abcdef\n")
        .expect("Ingest failed");

    assert_eq!(rows[0].values["foo"], json!("twelve"));
    assert_eq!(rows[0].failures_for("foo").len(), 1);
    assert_eq!(rows[0].failures_for("foo")[0].keyword, "type");
}

#[test]
fn test_missing_required_and_extra_column_are_record_level() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.csv", "bar,extra\nabcdef,x\n")
        .expect("Ingest failed");

    let failures = &rows[0].error;
    assert_eq!(failures.len(), 2);
    assert!(failures.iter().all(|f| f.is_record_level()));
    assert!(rows[0].failures_for("bar").is_empty());
    assert_eq!(state.summary().record_level_failures, 2);
}

#[test]
fn test_multiple_files_are_concatenated() {
    let first = create_test_file("foo,bar\n1,abcdef\n");
    let second = create_test_file("foo,bar\n2,ab\n3,abcdef\n");
    let sources = vec![
        IngestSource::from_file(first.path()).expect("Read failed"),
        IngestSource::from_file(second.path()).expect("Read failed"),
    ];

    let mut state = pipeline();
    let rows = state.ingest(&sources).expect("Ingest failed");

    let ids: Vec<RowId> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![RowId(0), RowId(1), RowId(2)]);
    assert_eq!(state.sources().len(), 2);
    assert_eq!(state.errors().rows_with_errors(), 1);
}

#[test]
fn test_malformed_file_leaves_state_untouched() {
    let mut state = pipeline();
    state
        .ingest_text("good.csv", "foo,bar\n1,abcdef\n")
        .expect("Ingest failed");

    let err = state
        .ingest(&[
            IngestSource::new("also-good.csv", "foo\n2\n"),
            IngestSource::new("bad.csv", "foo,foo\n1,2\n"),
        ])
        .unwrap_err();

    assert!(matches!(err, GridformError::DuplicateHeader(_)));
    assert!(err.is_input_error());
    assert_eq!(state.current().len(), 1);
    assert_eq!(state.current()[0].values["foo"], json!(1));
}

#[test]
fn test_header_only_template_replaces_dataset() {
    let mut state = pipeline();
    state
        .ingest_text("forms.csv", "foo,bar\n12,ab\n")
        .expect("Ingest failed");

    let rows = state
        .ingest_text("template.csv", "foo,bar,baz\n")
        .expect("Ingest failed");

    assert!(rows.is_empty());
    let keys: Vec<&str> = state.columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["select-row", "foo", "bar", "baz"]);
    assert!(state.current().is_empty());
    assert!(state.original().is_empty());
    assert!(!state.errors().has_errors());
    assert_eq!(state.diff().to_string(), "no changes");
}

#[test]
fn test_row_of_bare_delimiters_is_kept() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.csv", "foo,bar\n1,abcdef\n,\n2,abcdef\n")
        .expect("Ingest failed");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].values["foo"], json!(""));
    assert_eq!(rows[1].failures_for("foo").len(), 1);
}

#[test]
fn test_rows_are_padded_to_combined_header() {
    let mut state = pipeline();
    let rows = state
        .ingest(&[
            IngestSource::new("a.csv", "foo\n1\n"),
            IngestSource::new("b.csv", "foo,bar\n2,abcdef\n"),
        ])
        .expect("Ingest failed");

    let keys: Vec<&str> = rows[0].values.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["foo", "bar"]);
    assert_eq!(rows[0].values["bar"], json!(""));
    assert_eq!(rows[0].failures_for("bar").len(), 1);
    assert!(rows[1].is_valid());
}

// =============================================================================
// Editing and diffing
// =============================================================================

#[test]
fn test_fixing_a_cell_clears_its_failure_and_shows_in_diff() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.csv", "foo,bar\n12,ab\n")
        .expect("Ingest failed");
    assert_eq!(state.diff().to_string(), "no changes");

    let mut edited = EditedRow::from(rows[0].clone());
    edited.values.insert("bar".to_string(), json!("abcdef"));
    let rows = state.edit_all(vec![edited]);

    assert!(rows[0].is_valid());
    assert!(state.check_submit().is_clean());
    assert_eq!(
        state.diff().to_string(),
        "~ row 0\n-   bar: \"ab\"\n+   bar: \"abcdef\""
    );
}

#[test]
fn test_add_and_delete_rows() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.csv", "foo,bar\n1,abcdef\n2,abcdef\n")
        .expect("Ingest failed");

    let mut new_values = gridform::Record::new();
    new_values.insert("foo".to_string(), json!("3"));
    let edits = vec![EditedRow::from(rows[1].clone()), EditedRow::new(new_values)];
    let rows = state.edit_all(edits);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].id, RowId(2));
    assert_eq!(rows[1].values["foo"], json!(3));

    let diff = state.diff();
    assert_eq!(diff.removed_count(), 1);
    assert_eq!(diff.added_count(), 1);
    assert_eq!(diff.modified_count(), 0);
}

#[test]
fn test_stale_annotations_are_ignored_on_edit() {
    let mut state = pipeline();
    let rows = state
        .ingest_text("forms.csv", "foo,bar\n12,ab\n")
        .expect("Ingest failed");

    // Round-trip through JSON as the grid would, with the error still attached.
    let body = serde_json::to_value(&rows).expect("Serialize failed");
    assert!(body[0]["error"].is_array());
    let edits: Vec<EditedRow> = serde_json::from_value(body).expect("Deserialize failed");

    let rows = state.edit_all(edits);
    assert_eq!(rows[0].error.len(), 1);
    assert_eq!(state.errors().total_failures(), 1);
}

#[test]
fn test_domain_column_named_error_is_plain_data() {
    let mut state = PipelineState::new();
    let rows = state
        .ingest_text("forms.csv", "foo,error\n1,boom\n")
        .expect("Ingest failed");

    assert_eq!(rows[0].values["error"], json!("boom"));
    assert!(rows[0].error.is_empty());
}
