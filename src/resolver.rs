//! Adapter and field name resolution against a [`Schema`].
//!
//! Adapter names are normalized by appending [`ADAPTER_SUFFIX`] (idempotent)
//! and, when a set of known adapters is available, checked for membership.
//!
//! Field names are matched against the descriptors of the resolved source in
//! three tiers, first match wins and earlier tiers beat later ones:
//!
//! 1. exact match on the fully-qualified `name`
//! 2. exact, case-sensitive match on `title`
//! 3. dotted-suffix match: `name` ends with `"." + requested`
//!
//! Within a tier the first descriptor in schema order wins.
//!
//! Without a schema, [`qualify_field`] only adds the namespace prefix.

use tracing::debug;

use crate::error::FieldError;
use crate::schema::{FieldDescriptor, Schema};
use crate::types::{Resolution, Source, ADAPTER_PREFIX, ADAPTER_SUFFIX, GENERIC_PREFIX};

/// Append the adapter suffix unless the name already carries it.
pub fn normalize_adapter_name(name: &str) -> String {
    if name.ends_with(ADAPTER_SUFFIX) {
        name.to_string()
    } else {
        format!("{}{}", name, ADAPTER_SUFFIX)
    }
}

/// Resolve a requested adapter name to its canonical identifier.
///
/// With `known` set to `None` the normalized name is returned without a
/// membership check.
pub fn resolve_adapter(name: &str, known: Option<&[String]>) -> Resolution {
    let candidate = normalize_adapter_name(name);

    let Some(known) = known else {
        return Resolution::Resolved(candidate);
    };

    if known.iter().any(|k| *k == candidate) {
        Resolution::Resolved(candidate)
    } else {
        debug!(adapter = name, candidate = %candidate, "unknown adapter name");
        Resolution::Invalid(FieldError::UnknownAdapterName {
            name: name.to_string(),
            known: known.to_vec(),
        })
    }
}

/// Resolve an adapter name, raising or returning the `INVALID_` sentinel.
///
/// # Errors
///
/// Returns `FieldError::UnknownAdapterName` when `error` is set and the
/// adapter is not in `known`.
pub fn find_adapter(
    name: &str,
    known: Option<&[String]>,
    error: bool,
) -> Result<String, FieldError> {
    resolve_adapter(name, known).into_checked(error)
}

/// Resolve a field name within a source.
///
/// Returns the adapter resolution and the field resolution. For
/// [`Source::Generic`] the adapter resolution is always `generic`. When the
/// adapter cannot be resolved, the field resolves to
/// `FieldError::UnknownError` since there is no descriptor set to search.
pub fn resolve_field(name: &str, source: &Source, schema: &Schema) -> (Resolution, Resolution) {
    let (adapter, fields) = match source {
        Source::Generic => (
            Resolution::Resolved(source.as_str().to_string()),
            schema.generic.as_slice(),
        ),
        Source::Adapter(adapter_name) => {
            let known = schema.adapter_names();
            match resolve_adapter(adapter_name, Some(&known)) {
                Resolution::Resolved(canonical) => {
                    let fields = schema
                        .specific
                        .get(&canonical)
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    (Resolution::Resolved(canonical), fields)
                }
                invalid => {
                    let field = Resolution::Invalid(FieldError::UnknownError {
                        name: name.to_string(),
                        message: format!("adapter \"{}\" could not be resolved", adapter_name),
                    });
                    return (invalid, field);
                }
            }
        }
    };

    let field = match match_descriptor(name, fields) {
        Some(descriptor) => {
            debug!(field = name, path = %descriptor.name, "resolved field");
            Resolution::Resolved(descriptor.name.clone())
        }
        None => Resolution::Invalid(FieldError::UnknownFieldName {
            name: name.to_string(),
            adapter: adapter.value(),
            known: fields.iter().map(|f| f.name.clone()).collect(),
        }),
    };

    (adapter, field)
}

/// Resolve a field name, raising or returning `INVALID_` sentinels.
///
/// `adapter_name` is `generic` or an adapter in short or canonical form.
/// Returns `(adapter, field_path)`.
///
/// # Errors
///
/// When `error` is set, returns the adapter error if the adapter is unknown,
/// otherwise `FieldError::UnknownFieldName` if the field is unknown.
pub fn find_field(
    name: &str,
    adapter_name: &str,
    schema: &Schema,
    error: bool,
) -> Result<(String, String), FieldError> {
    let (adapter, field) = resolve_field(name, &Source::parse(adapter_name), schema);
    let adapter = adapter.into_checked(error)?;
    let field = field.into_checked(error)?;
    Ok((adapter, field))
}

/// Qualify a field name without a schema.
///
/// Prefixes the name with the source's namespace unless it already carries
/// it. Nothing is checked, so this never fails. Returns `(adapter, field_path)`.
pub fn qualify_field(name: &str, source: &Source) -> (String, String) {
    let (adapter, prefix) = match source {
        Source::Generic => (source.as_str().to_string(), GENERIC_PREFIX.to_string()),
        Source::Adapter(adapter_name) => {
            let canonical = normalize_adapter_name(adapter_name);
            let prefix = format!("{}{}.", ADAPTER_PREFIX, canonical);
            (canonical, prefix)
        }
    };

    let field = if name.starts_with(&prefix) {
        name.to_string()
    } else {
        format!("{}{}", prefix, name)
    };
    (adapter, field)
}

fn match_descriptor<'a>(name: &str, fields: &'a [FieldDescriptor]) -> Option<&'a FieldDescriptor> {
    if let Some(found) = fields.iter().find(|f| f.name == name) {
        return Some(found);
    }

    if name.is_empty() {
        return None;
    }

    if let Some(found) = fields.iter().find(|f| f.title == name) {
        return Some(found);
    }

    let suffix = format!(".{}", name);
    fields.iter().find(|f| f.name.ends_with(&suffix))
}
