//! Server-reported catalogue of known generic and per-adapter fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::LoadError;
use crate::types::{json_type_name, Source, ADAPTER_PREFIX, GENERIC_PREFIX};

/// A single known field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Fully-qualified dotted path, e.g. `specific_data.data.hostname`.
    pub name: String,
    /// Display label.
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            field_type: field_type.into(),
        }
    }

    /// Name with its namespace removed, e.g. `hostname` or `network_interfaces.ips`.
    pub fn short_name(&self) -> &str {
        if let Some(rest) = self.name.strip_prefix(GENERIC_PREFIX) {
            return rest;
        }
        if let Some((_, field)) = self
            .name
            .strip_prefix(ADAPTER_PREFIX)
            .and_then(|rest| rest.split_once('.'))
        {
            return field;
        }
        &self.name
    }
}

/// Known fields for one asset type.
///
/// `specific` is keyed by canonical adapter identifier (`<name>_adapter`).
/// The schema is an immutable snapshot; nothing in this crate mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub generic: Vec<FieldDescriptor>,
    #[serde(default)]
    pub specific: BTreeMap<String, Vec<FieldDescriptor>>,
}

impl Schema {
    /// Build a schema from the JSON returned by the fields endpoint.
    ///
    /// Unknown top-level keys and unknown descriptor keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidSchema` if `generic` is not an array,
    /// `specific` is not an object of arrays, or a descriptor has no `name`.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let Some(map) = value.as_object() else {
            return Err(LoadError::InvalidSchema {
                message: format!("expected object, got {}", json_type_name(value)),
            });
        };

        if let Some(generic) = map.get("generic") {
            if !generic.is_array() {
                return Err(LoadError::InvalidSchema {
                    message: format!(
                        "generic: expected array, got {}",
                        json_type_name(generic)
                    ),
                });
            }
        }

        if let Some(specific) = map.get("specific") {
            let Some(adapters) = specific.as_object() else {
                return Err(LoadError::InvalidSchema {
                    message: format!(
                        "specific: expected object, got {}",
                        json_type_name(specific)
                    ),
                });
            };
            for (adapter, fields) in adapters {
                if !fields.is_array() {
                    return Err(LoadError::InvalidSchema {
                        message: format!(
                            "specific/{}: expected array, got {}",
                            adapter,
                            json_type_name(fields)
                        ),
                    });
                }
            }
        }

        let schema = Schema {
            generic: parse_descriptors(map.get("generic"), "generic")?,
            specific: match map.get("specific").and_then(|s| s.as_object()) {
                Some(adapters) => adapters
                    .iter()
                    .map(|(adapter, fields)| {
                        let path = format!("specific/{}", adapter);
                        parse_descriptors(Some(fields), &path).map(|d| (adapter.clone(), d))
                    })
                    .collect::<Result<_, _>>()?,
                None => BTreeMap::new(),
            },
        };

        for (adapter, field) in schema.misplaced_fields() {
            warn!(
                adapter,
                field = %field.name,
                "adapter field outside its adapters_data namespace"
            );
        }

        Ok(schema)
    }

    /// Adapter descriptors whose `name` does not start with `adapters_data.<adapter>.`.
    ///
    /// Generic descriptors are not checked: the server reports top-level
    /// attributes such as `labels` alongside `specific_data.data.` paths.
    pub fn misplaced_fields(&self) -> Vec<(&str, &FieldDescriptor)> {
        self.specific
            .iter()
            .flat_map(|(adapter, fields)| {
                let prefix = format!("{}{}.", ADAPTER_PREFIX, adapter);
                fields
                    .iter()
                    .filter(move |f| !f.name.starts_with(&prefix))
                    .map(move |f| (adapter.as_str(), f))
            })
            .collect()
    }

    /// Canonical identifiers of every adapter in the schema, sorted.
    pub fn adapter_names(&self) -> Vec<String> {
        self.specific.keys().cloned().collect()
    }

    /// Descriptors for a source, looked up by exact key.
    ///
    /// Adapter sources must already be canonical; see
    /// [`resolve_adapter`](crate::resolve_adapter).
    pub fn fields(&self, source: &Source) -> Option<&[FieldDescriptor]> {
        match source {
            Source::Generic => Some(&self.generic),
            Source::Adapter(name) => self.specific.get(name).map(Vec::as_slice),
        }
    }
}

fn parse_descriptors(value: Option<&Value>, path: &str) -> Result<Vec<FieldDescriptor>, LoadError> {
    let Some(items) = value.and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item.clone()).map_err(|e| LoadError::InvalidSchema {
                message: format!("{}/{}: {}", path, i, e),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_reads_generic_and_specific() {
        let value = json!({
            "generic": [
                { "name": "specific_data.data.hostname", "title": "Host Name", "type": "string" }
            ],
            "specific": {
                "active_directory_adapter": [
                    {
                        "name": "adapters_data.active_directory_adapter.hostname",
                        "title": "Host Name",
                        "type": "string",
                        "format": "ignored"
                    }
                ]
            },
            "schema": {}
        });

        let schema = Schema::from_value(&value).unwrap();
        assert_eq!(schema.generic.len(), 1);
        assert_eq!(schema.generic[0].title, "Host Name");
        assert_eq!(schema.generic[0].field_type, "string");
        assert_eq!(schema.adapter_names(), vec!["active_directory_adapter"]);
    }

    #[test]
    fn from_value_missing_parts_are_empty() {
        let schema = Schema::from_value(&json!({})).unwrap();
        assert!(schema.generic.is_empty());
        assert!(schema.specific.is_empty());
    }

    #[test]
    fn from_value_title_and_type_optional() {
        let schema =
            Schema::from_value(&json!({ "generic": [{ "name": "specific_data.data.id" }] }))
                .unwrap();
        assert_eq!(schema.generic[0], FieldDescriptor::new("specific_data.data.id", "", ""));
    }

    #[test]
    fn from_value_rejects_wrong_shapes() {
        let result = Schema::from_value(&json!([]));
        assert!(matches!(result, Err(LoadError::InvalidSchema { .. })));

        let result = Schema::from_value(&json!({ "generic": {} }));
        assert!(matches!(result, Err(LoadError::InvalidSchema { message }) if message.contains("generic")));

        let result = Schema::from_value(&json!({ "specific": { "ad_adapter": "x" } }));
        assert!(matches!(result, Err(LoadError::InvalidSchema { message }) if message.contains("ad_adapter")));

        let result = Schema::from_value(&json!({ "generic": [{ "title": "no name" }] }));
        assert!(matches!(result, Err(LoadError::InvalidSchema { message }) if message.starts_with("generic/0")));
    }

    #[test]
    fn short_name_strips_namespace() {
        let d = FieldDescriptor::new("specific_data.data.network_interfaces.ips", "", "");
        assert_eq!(d.short_name(), "network_interfaces.ips");
        let d = FieldDescriptor::new("adapters_data.csv_adapter.id", "", "");
        assert_eq!(d.short_name(), "id");
        let d = FieldDescriptor::new("labels", "", "");
        assert_eq!(d.short_name(), "labels");
    }

    #[test]
    fn fields_by_source() {
        let mut schema = Schema::default();
        schema.specific.insert(
            "csv_adapter".into(),
            vec![FieldDescriptor::new("adapters_data.csv_adapter.id", "ID", "string")],
        );

        assert_eq!(schema.fields(&Source::Generic).map(|f| f.len()), Some(0));
        assert_eq!(
            schema
                .fields(&Source::Adapter("csv_adapter".into()))
                .map(|f| f.len()),
            Some(1)
        );
        assert!(schema.fields(&Source::Adapter("csv".into())).is_none());
    }

    #[test]
    fn misplaced_adapter_fields_reported() {
        let schema = Schema::from_value(&json!({
            "generic": [{ "name": "labels" }],
            "specific": {
                "csv_adapter": [
                    { "name": "adapters_data.csv_adapter.id" },
                    { "name": "adapters_data.other_adapter.id" },
                    { "name": "hostname" }
                ]
            }
        }))
        .unwrap();

        let misplaced: Vec<_> = schema
            .misplaced_fields()
            .into_iter()
            .map(|(adapter, f)| (adapter, f.name.as_str()))
            .collect();
        assert_eq!(
            misplaced,
            vec![
                ("csv_adapter", "adapters_data.other_adapter.id"),
                ("csv_adapter", "hostname"),
            ]
        );
    }
}
