//! Field set validation - turns a request of short field names into a query projection.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FieldError, LoadError};
use crate::resolver::resolve_field;
use crate::schema::Schema;
use crate::types::{json_type_name, Resolution, Source, ValidateOptions, ALL_FIELD, ALL_PROJECTION};

/// Ordered mapping from source to requested field names.
///
/// Adding names to a source that is already present appends to it, so each
/// source appears once, at the position it was first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRequest {
    entries: Vec<(Source, Vec<String>)>,
}

impl FieldRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names for a source. Empty names are skipped.
    pub fn push<I, S>(&mut self, source: Source, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| !name.is_empty());

        match self.entries.iter().position(|(s, _)| *s == source) {
            Some(i) => self.entries[i].1.extend(names),
            None => self.entries.push((source, names.collect())),
        }
        self
    }

    /// Add generic field names.
    pub fn generic<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Source::Generic, names);
        self
    }

    /// Add field names for an adapter, short or canonical form.
    pub fn adapter<I, S>(mut self, adapter: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Source::Adapter(adapter.into()), names);
        self
    }

    /// Build a request from a JSON object of `source -> names`.
    ///
    /// A source value may be a single name instead of an array; a lone
    /// string is wrapped, numbers and booleans are wrapped as their text.
    /// `null`, empty strings, empty arrays and empty objects are treated as
    /// placeholders and skipped, both as source values and as array items.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidRequest` if the value is not an object or
    /// a name is a non-empty array or object.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let Some(map) = value.as_object() else {
            return Err(LoadError::InvalidRequest {
                message: format!("expected object, got {}", json_type_name(value)),
            });
        };

        let mut request = FieldRequest::new();
        for (key, names) in map {
            let names = match names {
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| field_name(item, &format!("{}/{}", key, i)))
                    .collect::<Result<Vec<_>, _>>()?,
                other => vec![field_name(other, key)?],
            };
            request.push(Source::parse(key), names.into_iter().flatten());
        }
        Ok(request)
    }

    pub fn entries(&self) -> &[(Source, Vec<String>)] {
        &self.entries
    }

    /// Generic names requested so far.
    pub fn generic_names(&self) -> &[String] {
        self.entries
            .iter()
            .find(|(s, _)| s.is_generic())
            .map(|(_, names)| names.as_slice())
            .unwrap_or_default()
    }

    /// True when no source holds any name.
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, names)| names.is_empty())
    }
}

/// Coerce one request item to a field name, `None` for a placeholder.
fn field_name(value: &Value, path: &str) -> Result<Option<String>, LoadError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        other => Err(LoadError::InvalidRequest {
            message: format!(
                "{}: expected field name, got {}",
                path,
                json_type_name(other)
            ),
        }),
    }
}

/// Validate a field request and return the canonical projection.
///
/// Generic names are processed first, then each adapter source in the order
/// it was added; names keep caller order and duplicate paths keep their
/// first position. If the generic source contains `all`, the result is
/// exactly `["specific_data"]`.
///
/// With `options.fields_error` off, unknown names appear in the output as
/// `INVALID_<name>` sentinels instead of failing the call.
///
/// # Errors
///
/// With `options.fields_error` on, returns the first `FieldError` met.
pub fn validate(
    schema: &Schema,
    request: &FieldRequest,
    options: &ValidateOptions,
) -> Result<Vec<String>, FieldError> {
    let resolved = resolve_request(schema, request, options)?;
    Ok(resolved.iter().map(Resolution::value).collect())
}

/// Resolve every name of a request, keeping invalid entries when allowed.
///
/// Same ordering, deduplication and `all` handling as [`validate`]. With
/// `options.fields_error` off this never fails and `Invalid` entries are
/// returned in place; an unresolvable adapter yields the field's error.
///
/// # Errors
///
/// With `options.fields_error` on, an unknown adapter raises
/// `FieldError::UnknownAdapterName` and an unknown field raises
/// `FieldError::UnknownFieldName`.
pub fn resolve_request(
    schema: &Schema,
    request: &FieldRequest,
    options: &ValidateOptions,
) -> Result<Vec<Resolution>, FieldError> {
    let mut generic: Vec<String> = request.generic_names().to_vec();
    if generic.is_empty() && options.default_fields {
        debug!(defaults = ?options.defaults, "injecting default generic fields");
        generic = options.defaults.clone();
    }

    if generic.iter().any(|name| name == ALL_FIELD) {
        return Ok(vec![Resolution::Resolved(ALL_PROJECTION.to_string())]);
    }

    let generic_source = Source::Generic;
    let adapters = request.entries().iter().filter(|(s, _)| !s.is_generic());
    let sources = std::iter::once((&generic_source, generic.as_slice()))
        .chain(adapters.map(|(source, names)| (source, names.as_slice())));

    let mut seen = std::collections::HashSet::new();
    let mut resolved = Vec::new();

    for (source, names) in sources {
        for name in names {
            let resolution = resolve_name(name, source, schema, options.fields_error)?;
            if seen.insert(resolution.value()) {
                resolved.push(resolution);
            }
        }
    }

    Ok(resolved)
}

fn resolve_name(
    name: &str,
    source: &Source,
    schema: &Schema,
    error: bool,
) -> Result<Resolution, FieldError> {
    let (adapter, field) = resolve_field(name, source, schema);

    if error {
        if let Resolution::Invalid(err) = adapter {
            return Err(err);
        }
        if let Resolution::Invalid(err) = field {
            return Err(err);
        }
    } else if let Resolution::Invalid(err) = &field {
        warn!(source = %source, field = name, error = %err, "field did not resolve");
    }

    Ok(field)
}
