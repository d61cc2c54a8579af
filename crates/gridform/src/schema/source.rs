//! Schema source: the `/api/v1/forms` endpoint.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GridformError, Result};

use super::document::FormSchema;

/// Path of the forms endpoint, relative to the service base URL.
pub const FORMS_PATH: &str = "/api/v1/forms";

/// Response body of `GET /api/v1/forms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsResponse {
    pub data: FormsData,
}

/// Payload of [`FormsResponse`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsData {
    pub schema: Value,
}

/// Full URL of the forms endpoint for a base URL.
pub fn forms_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), FORMS_PATH)
}

/// Fetch the form schema once from `<base_url>/api/v1/forms`.
///
/// There is no retry; callers treat an error as "validation disabled".
pub async fn fetch_schema(base_url: &str) -> Result<FormSchema> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| GridformError::Config(format!("Failed to create HTTP client: {}", e)))?;

    fetch_schema_with(&client, base_url).await
}

/// Fetch the form schema with an existing client.
pub async fn fetch_schema_with(client: &Client, base_url: &str) -> Result<FormSchema> {
    let url = forms_url(base_url);
    tracing::debug!(%url, "fetching form schema");

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| GridformError::SchemaFetch(format!("GET {} failed: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(GridformError::SchemaFetch(format!(
            "GET {} returned {}",
            url, status
        )));
    }

    let body: FormsResponse = response
        .json()
        .await
        .map_err(|e| GridformError::SchemaFetch(format!("Invalid forms response: {}", e)))?;

    let schema = FormSchema::new(body.data.schema)?;
    tracing::info!(
        version = %schema.version(),
        fields = schema.fields().len(),
        "loaded form schema"
    );
    Ok(schema)
}
