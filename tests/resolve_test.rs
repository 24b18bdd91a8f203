//! Integration tests for adapter, field and field set resolution.

use asset_fields::{
    find_adapter, find_field, load_schema_str, resolve_adapter, resolve_request, validate,
    FieldError, FieldRequest, Resolution, Schema, ValidateOptions,
};

fn schema() -> Schema {
    load_schema_str(
        r#"{
            "generic": [
                {"name": "specific_data.data.hostname", "title": "Host Name", "type": "string"},
                {"name": "specific_data.data.id", "title": "ID", "type": "string"},
                {"name": "specific_data.data.network_interfaces.ips", "title": "Network Interfaces: IPs", "type": "array"},
                {"name": "specific_data.data.network_interfaces.mac", "title": "Network Interfaces: MAC", "type": "array"}
            ],
            "specific": {
                "known_adapter": [
                    {"name": "adapters_data.known_adapter.hostname", "title": "Host Name", "type": "string"},
                    {"name": "adapters_data.known_adapter.id", "title": "ID", "type": "string"}
                ],
                "active_directory_adapter": [
                    {"name": "adapters_data.active_directory_adapter.hostname", "title": "Host Name", "type": "string"}
                ]
            }
        }"#,
    )
    .unwrap()
}

fn no_defaults() -> ValidateOptions {
    ValidateOptions::default().default_fields(false)
}

// === Adapter Resolution ===

mod adapters {
    use super::*;

    #[test]
    fn every_known_adapter_resolves() {
        let schema = schema();
        let known = schema.adapter_names();

        for adapter in &known {
            let short = adapter.trim_end_matches("_adapter");
            assert_eq!(find_adapter(adapter, Some(&known), true).unwrap(), *adapter);
            assert_eq!(find_adapter(short, Some(&known), true).unwrap(), *adapter);
        }
    }

    #[test]
    fn unknown_adapter_sentinel_never_raises() {
        let known = schema().adapter_names();
        for name in ["badwolf", "moo_adapter", "SDNJS:LDJGSKLDJF"] {
            assert_eq!(
                find_adapter(name, Some(&known), false).unwrap(),
                format!("INVALID_{}", name)
            );
        }
    }

    #[test]
    fn unknown_adapter_error_lists_known() {
        let known = schema().adapter_names();
        let err = find_adapter("badwolf", Some(&known), true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown adapter name \"badwolf\", valid adapters: active_directory_adapter, known_adapter"
        );
    }

    #[test]
    fn unchecked_mode_only_normalizes() {
        assert_eq!(
            resolve_adapter("anything", None),
            Resolution::Resolved("anything_adapter".into())
        );
    }
}

// === Field Resolution ===

mod fields {
    use super::*;

    #[test]
    fn every_generic_descriptor_resolves_by_title_and_short_name() {
        let schema = schema();
        for descriptor in &schema.generic {
            let by_title = find_field(&descriptor.title, "generic", &schema, true).unwrap();
            assert_eq!(by_title, ("generic".to_string(), descriptor.name.clone()));

            let by_short = find_field(descriptor.short_name(), "generic", &schema, true).unwrap();
            assert_eq!(by_short, ("generic".to_string(), descriptor.name.clone()));
        }
    }

    #[test]
    fn fully_qualified_name_is_idempotent() {
        let schema = schema();
        let (_, path) = find_field("specific_data.data.hostname", "generic", &schema, true).unwrap();
        assert_eq!(path, "specific_data.data.hostname");

        let (_, again) = find_field(&path, "generic", &schema, true).unwrap();
        assert_eq!(again, path);
    }

    #[test]
    fn adapter_field_short_and_canonical_adapter() {
        let schema = schema();
        for adapter in ["active_directory", "active_directory_adapter"] {
            let found = find_field("hostname", adapter, &schema, true).unwrap();
            assert_eq!(
                found,
                (
                    "active_directory_adapter".to_string(),
                    "adapters_data.active_directory_adapter.hostname".to_string()
                )
            );
        }
    }

    #[test]
    fn generic_literal_is_case_sensitive() {
        let err = find_field("hostname", "Generic", &schema(), true).unwrap_err();
        assert!(matches!(err, FieldError::UnknownAdapterName { .. }));
    }

    #[test]
    fn unknown_field_raises_or_degrades() {
        let schema = schema();
        let err = find_field("AJKSLJAKN", "generic", &schema, true).unwrap_err();
        assert!(matches!(err, FieldError::UnknownFieldName { .. }));

        assert_eq!(
            find_field("AJKSLJAKN", "generic", &schema, false).unwrap(),
            ("generic".to_string(), "INVALID_AJKSLJAKN".to_string())
        );
    }

    #[test]
    fn unknown_adapter_degrades_both_names() {
        assert_eq!(
            find_field("AJKSLJAKN", "moo", &schema(), false).unwrap(),
            ("INVALID_moo".to_string(), "INVALID_AJKSLJAKN".to_string())
        );
    }
}

// === Field Set Validation ===

mod field_sets {
    use super::*;

    #[test]
    fn single_short_name() {
        let request = FieldRequest::new().generic(["hostname"]);
        let result = validate(&schema(), &request, &ValidateOptions::default()).unwrap();
        assert_eq!(result, vec!["specific_data.data.hostname"]);
    }

    #[test]
    fn short_and_qualified_collapse() {
        let request = FieldRequest::new().generic(["hostname", "specific_data.data.hostname"]);
        let result = validate(&schema(), &request, &ValidateOptions::default()).unwrap();
        assert_eq!(result, vec!["specific_data.data.hostname"]);
    }

    #[test]
    fn generic_then_adapter() {
        let request = FieldRequest::new()
            .generic(["hostname"])
            .adapter("known_adapter", ["hostname"]);
        let result = validate(&schema(), &request, &ValidateOptions::default()).unwrap();
        assert_eq!(
            result,
            vec![
                "specific_data.data.hostname",
                "adapters_data.known_adapter.hostname"
            ]
        );
    }

    #[test]
    fn adapter_names_keep_caller_order() {
        let request = FieldRequest::new()
            .adapter("known", ["id", "hostname", "id"])
            .adapter("active_directory", ["hostname"]);
        let result = validate(&schema(), &request, &no_defaults()).unwrap();
        assert_eq!(
            result,
            vec![
                "adapters_data.known_adapter.id",
                "adapters_data.known_adapter.hostname",
                "adapters_data.active_directory_adapter.hostname"
            ]
        );
    }

    #[test]
    fn all_is_wildcard() {
        let request = FieldRequest::new().generic(["all"]);
        let result = validate(&schema(), &request, &no_defaults()).unwrap();
        assert_eq!(result, vec!["specific_data"]);

        let request = FieldRequest::new()
            .generic(["hostname", "specific_data.data.hostname", "all"])
            .adapter("known", ["id"]);
        let result = validate(&schema(), &request, &no_defaults()).unwrap();
        assert_eq!(result, vec!["specific_data"]);
    }

    #[test]
    fn unknown_field_lenient_sentinel() {
        let request = FieldRequest::new().generic(["nope"]);
        let result = validate(&schema(), &request, &no_defaults().fields_error(false)).unwrap();
        assert_eq!(result, vec!["INVALID_nope"]);
    }

    #[test]
    fn unknown_field_raises_by_default() {
        let request = FieldRequest::new().generic(["nope"]);
        let err = validate(&schema(), &request, &no_defaults()).unwrap_err();
        assert!(matches!(err, FieldError::UnknownFieldName { name, .. } if name == "nope"));
    }

    #[test]
    fn error_aborts_without_partial_result() {
        let request = FieldRequest::new()
            .generic(["hostname"])
            .adapter("known", ["nope"]);
        let result = resolve_request(&schema(), &request, &no_defaults());
        assert!(result.is_err());
    }

    #[test]
    fn empty_request_without_defaults_is_empty() {
        let result = validate(&schema(), &FieldRequest::new(), &no_defaults()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn device_defaults_injected() {
        let result = validate(&schema(), &FieldRequest::new(), &ValidateOptions::default()).unwrap();
        assert_eq!(
            result,
            vec![
                "specific_data.data.hostname",
                "specific_data.data.network_interfaces.ips",
                "specific_data.data.network_interfaces.mac"
            ]
        );
    }

    #[test]
    fn validate_is_idempotent() {
        let schema = schema();
        let request = FieldRequest::new()
            .generic(["id", "hostname"])
            .adapter("known", ["hostname"]);
        let options = ValidateOptions::default();
        let first = validate(&schema, &request, &options).unwrap();
        let second = validate(&schema, &request, &options).unwrap();
        assert_eq!(first, second);
    }
}

// === Loosely-typed Requests ===

mod json_requests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nonlist_values_wrapped() {
        let request = FieldRequest::from_value(&json!({
            "generic": "hostname",
            "known": "id"
        }))
        .unwrap();
        let result = validate(&schema(), &request, &no_defaults()).unwrap();
        assert_eq!(
            result,
            vec!["specific_data.data.hostname", "adapters_data.known_adapter.id"]
        );
    }

    #[test]
    fn placeholders_ignored_even_for_unknown_adapters() {
        let request = FieldRequest::from_value(&json!({ "x": [null, {}] })).unwrap();
        let result = validate(&schema(), &request, &no_defaults()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn generic_key_position_does_not_matter() {
        let request = FieldRequest::from_value(&json!({
            "known": ["hostname"],
            "generic": ["hostname"]
        }))
        .unwrap();
        let result = validate(&schema(), &request, &no_defaults()).unwrap();
        assert_eq!(
            result,
            vec![
                "specific_data.data.hostname",
                "adapters_data.known_adapter.hostname"
            ]
        );
    }

    #[test]
    fn lenient_mixed_request() {
        let request = FieldRequest::from_value(&json!({
            "x": ["x"],
            "y": ["y"],
            "generic": ["z", "hostname"]
        }))
        .unwrap();
        let options = no_defaults().fields_error(false);
        let result = validate(&schema(), &request, &options).unwrap();
        assert_eq!(
            result,
            vec![
                "INVALID_z",
                "specific_data.data.hostname",
                "INVALID_x",
                "INVALID_y"
            ]
        );
    }
}
