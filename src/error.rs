//! Error types for field resolution, schema loading and name lookup.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::INVALID_PREFIX;

/// Errors raised while resolving adapter and field names against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("unknown adapter name \"{name}\", valid adapters: {}", known.join(", "))]
    UnknownAdapterName { name: String, known: Vec<String> },

    #[error(
        "unknown field name \"{name}\" for adapter \"{adapter}\", valid fields: {}",
        known.join(", ")
    )]
    UnknownFieldName {
        name: String,
        adapter: String,
        known: Vec<String>,
    },

    #[error("unable to resolve field \"{name}\": {message}")]
    UnknownError { name: String, message: String },
}

impl FieldError {
    /// The name the caller asked for.
    pub fn requested(&self) -> &str {
        match self {
            Self::UnknownAdapterName { name, .. }
            | Self::UnknownFieldName { name, .. }
            | Self::UnknownError { name, .. } => name,
        }
    }

    /// Sentinel substituted for this error when errors are not raised.
    ///
    /// Always the requested name prefixed with `INVALID_`, never suffixed.
    pub fn sentinel(&self) -> String {
        format!("{}{}", INVALID_PREFIX, self.requested())
    }

    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Errors while loading a schema from disk, a string, or the network.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("invalid field request: {message}")]
    InvalidRequest { message: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while looking up named server objects.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{object_type} not found using {value_type} {value:?}")]
    ObjectNotFound {
        object_type: String,
        value_type: String,
        value: String,
    },

    #[error("invalid name pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl LookupError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LookupError::ObjectNotFound { .. } => 1,
            LookupError::InvalidPattern { .. } => 2,
        }
    }
}
