//! Schema loading from various sources.
//!
//! Handles loading field schemas from files, strings, URLs, and the
//! authenticated fields endpoint of a live server.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::schema::Schema;

#[cfg(feature = "remote")]
use std::time::Duration;

#[cfg(feature = "remote")]
use tracing::debug;

#[cfg(feature = "remote")]
use crate::types::AssetType;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a schema from a file path.
///
/// # Errors
///
/// Returns the errors of [`load_json`], or `LoadError::InvalidSchema`
/// if the document doesn't have the fields-endpoint shape.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    Schema::from_value(&load_json(path)?)
}

/// Load a schema from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON, or
/// `LoadError::InvalidSchema` if it has the wrong shape.
pub fn load_schema_str(content: &str) -> Result<Schema, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    Schema::from_value(&value)
}

/// Connection settings for a live server.
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://assets.example.com`.
    pub url: String,
    pub key: String,
    pub secret: String,
}

#[cfg(feature = "remote")]
impl ApiConfig {
    pub fn new(url: impl Into<String>, key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// URL of the known-fields endpoint for an asset type.
    pub fn fields_url(&self, asset_type: AssetType) -> String {
        format!("{}/api/{}/fields", self.url, asset_type.as_str())
    }
}

/// Load a schema from an HTTP/HTTPS URL without authentication.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails,
/// or `LoadError::InvalidSchema` if the response has the wrong shape.
#[cfg(feature = "remote")]
pub fn load_schema_url(url: &str) -> Result<Schema, LoadError> {
    fetch(url, None)
}

/// Fetch the known fields of an asset type from a live server.
///
/// Sends the API key and secret as `api-key` / `api-secret` headers.
///
/// # Errors
///
/// Returns `LoadError::NetworkError` on connection failure or an HTTP
/// error status, or `LoadError::InvalidSchema` for an unexpected body.
#[cfg(feature = "remote")]
pub fn fetch_known_fields(config: &ApiConfig, asset_type: AssetType) -> Result<Schema, LoadError> {
    fetch(&config.fields_url(asset_type), Some(config))
}

#[cfg(feature = "remote")]
fn fetch(url: &str, auth: Option<&ApiConfig>) -> Result<Schema, LoadError> {
    let network_error = |source: reqwest::Error| LoadError::NetworkError {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(network_error)?;

    let mut request = client.get(url).header("Accept", "application/json");
    if let Some(config) = auth {
        request = request
            .header("api-key", config.key.as_str())
            .header("api-secret", config.secret.as_str());
    }

    debug!(url, "fetching known fields");
    let response = request.send().map_err(network_error)?;

    // Check for HTTP errors before parsing
    let response = response.error_for_status().map_err(network_error)?;

    let value: Value = response.json().map_err(network_error)?;
    Schema::from_value(&value)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a schema from a file path or URL.
///
/// Automatically detects whether the source is a URL or file path.
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_schema_auto(source: &str) -> Result<Schema, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_schema_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_schema(Path::new(source))
    }
}
