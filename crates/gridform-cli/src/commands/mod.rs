//! CLI command implementations.

pub mod check;
pub mod diff;
pub mod serve;

use std::path::Path;

use colored::Colorize;
use gridform::schema::fetch_schema;
use gridform::{AnnotatedRow, FormSchema, GridformError, PipelineState};

use crate::config::{SchemaSource, Settings};

/// Build a pipeline and install the configured schema.
///
/// A local schema file must load. The forms endpoint is fetched once; if
/// that fails the pipeline runs with validation disabled.
pub async fn load_pipeline(settings: &Settings) -> Result<PipelineState, GridformError> {
    let mut state = PipelineState::with_config(settings.pipeline_config());

    match &settings.schema {
        SchemaSource::None => {
            tracing::warn!("no schema configured; validation disabled");
        }
        SchemaSource::File(path) => {
            state.set_schema(FormSchema::from_file(path)?)?;
        }
        SchemaSource::Url(url) => {
            state.apply_schema_fetch(fetch_schema(url).await);
        }
    }

    Ok(state)
}

/// Run [`load_pipeline`] from synchronous code.
pub fn load_pipeline_blocking(settings: &Settings) -> Result<PipelineState, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(load_pipeline(settings))?)
}

/// Print every failing row with its failures.
pub fn print_failures(rows: &[AnnotatedRow]) {
    for row in rows.iter().filter(|r| !r.is_valid()) {
        println!("  {} {}", "row".dimmed(), row.id.to_string().white().bold());
        for failure in &row.error {
            let location = match failure.field() {
                Some(field) => field,
                None => "(record)".to_string(),
            };
            println!(
                "    {} {} {}",
                location.yellow(),
                failure.keyword.dimmed(),
                failure.message
            );
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use gridform::schema::FORMS_PATH;
    use gridform::{ParserConfig, ValidatorOptions};
    use serde_json::json;

    fn settings(schema: SchemaSource) -> Settings {
        Settings {
            schema,
            port: 0,
            parser: ParserConfig::default(),
            validator: ValidatorOptions::default(),
        }
    }

    /// Serve the forms endpoint the way the form service does.
    async fn spawn_forms_service() -> String {
        let app = Router::new().route(
            FORMS_PATH,
            get(|| async {
                Json(json!({
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
                }))
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_schema_fetched_from_forms_endpoint() {
        let base = spawn_forms_service().await;
        let mut state = load_pipeline(&settings(SchemaSource::Url(base))).await.unwrap();

        assert!(state.validation_enabled());
        let rows = state.ingest_text("forms.csv", "foo,bar\n12,ab\n").unwrap();
        assert_eq!(rows[0].error[0].instance_path, "/bar");
    }

    #[tokio::test]
    async fn test_missing_endpoint_disables_validation() {
        let app = Router::new();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let state = load_pipeline(&settings(SchemaSource::Url(format!("http://{}", addr))))
            .await
            .unwrap();
        assert!(!state.validation_enabled());
    }

    #[tokio::test]
    async fn test_missing_schema_file_is_an_error() {
        let result = load_pipeline(&settings(SchemaSource::File("does-not-exist.json".into()))).await;
        assert!(matches!(result, Err(GridformError::Io { .. })));
    }
}
