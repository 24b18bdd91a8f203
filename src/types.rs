//! Core types for field and adapter resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FieldError;

/// Suffix that turns a short adapter name into its canonical identifier.
pub const ADAPTER_SUFFIX: &str = "_adapter";

/// Prefix of every sentinel produced in place of an unresolvable name.
pub const INVALID_PREFIX: &str = "INVALID_";

/// Source key reserved for adapter-agnostic fields.
pub const GENERIC_SOURCE: &str = "generic";

/// Namespace of generic field paths.
pub const GENERIC_PREFIX: &str = "specific_data.data.";

/// Namespace of adapter field paths, followed by `<adapter-id>.`.
pub const ADAPTER_PREFIX: &str = "adapters_data.";

/// Generic field name that selects every field.
pub const ALL_FIELD: &str = "all";

/// Projection token returned when every field is selected.
pub const ALL_PROJECTION: &str = "specific_data";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Where a requested field name should be looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Adapter-agnostic fields under `specific_data.data.`.
    Generic,
    /// Fields of one adapter, short or canonical name as typed by the caller.
    Adapter(String),
}

impl Source {
    /// Parse a source key. Only the exact literal `generic` is special.
    pub fn parse(key: &str) -> Self {
        if key == GENERIC_SOURCE {
            Source::Generic
        } else {
            Source::Adapter(key.to_string())
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Source::Generic)
    }

    /// The key as the caller would write it.
    pub fn as_str(&self) -> &str {
        match self {
            Source::Generic => GENERIC_SOURCE,
            Source::Adapter(name) => name,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a single adapter or field name.
///
/// Callers that want hard failures use [`Resolution::into_result`]; callers
/// that tolerate bad input use [`Resolution::value`], which yields the
/// `INVALID_` sentinel for unresolvable names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    Invalid(FieldError),
}

impl Resolution {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Resolution::Invalid(_))
    }

    /// Canonical value, or the sentinel for an invalid resolution.
    pub fn value(&self) -> String {
        match self {
            Resolution::Resolved(value) => value.clone(),
            Resolution::Invalid(err) => err.sentinel(),
        }
    }

    /// Convert into a `Result`, raising the carried error.
    pub fn into_result(self) -> Result<String, FieldError> {
        match self {
            Resolution::Resolved(value) => Ok(value),
            Resolution::Invalid(err) => Err(err),
        }
    }

    /// Convert into a `Result` only when `error` is set; otherwise degrade to the sentinel.
    pub fn into_checked(self, error: bool) -> Result<String, FieldError> {
        match self {
            Resolution::Resolved(value) => Ok(value),
            Resolution::Invalid(err) if error => Err(err),
            Resolution::Invalid(err) => Ok(err.sentinel()),
        }
    }
}

/// Kind of asset record queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Devices,
    Users,
}

impl AssetType {
    /// Path segment used by the REST API (`/api/devices/...`).
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Devices => "devices",
            AssetType::Users => "users",
        }
    }

    /// Generic fields requested when the caller names none.
    ///
    /// The first entry is the identifying field for the asset type.
    pub fn default_fields(&self) -> &'static [&'static str] {
        match self {
            AssetType::Devices => &["hostname", "network_interfaces.ips", "network_interfaces.mac"],
            AssetType::Users => &["username", "mail"],
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "devices" | "device" => Ok(AssetType::Devices),
            "users" | "user" => Ok(AssetType::Users),
            other => Err(format!("unknown asset type \"{}\": expected devices or users", other)),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for field set validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Inject `defaults` into the generic source when the caller supplied no generic fields.
    pub default_fields: bool,
    /// Raise on unknown names instead of emitting `INVALID_` sentinels.
    pub fields_error: bool,
    /// Generic field names injected when `default_fields` applies.
    pub defaults: Vec<String>,
}

impl ValidateOptions {
    /// Create options for an asset type: defaults on, errors raised.
    pub fn new(asset_type: AssetType) -> Self {
        Self {
            default_fields: true,
            fields_error: true,
            defaults: asset_type
                .default_fields()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    pub fn default_fields(mut self, default_fields: bool) -> Self {
        self.default_fields = default_fields;
        self
    }

    pub fn fields_error(mut self, fields_error: bool) -> Self {
        self.fields_error = fields_error;
        self
    }

    /// Replace the injected default generic fields.
    pub fn defaults<I, S>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = defaults.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self::new(AssetType::default())
    }
}
