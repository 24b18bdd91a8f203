//! Asset Fields
//!
//! Field and adapter name resolution for asset-management REST API queries.
//!
//! The platform exposes every asset field under a fully-qualified path:
//! generic fields live under `specific_data.data.` and adapter fields under
//! `adapters_data.<adapter>_adapter.`. This library turns short names such as
//! `hostname` into those paths, checked against the schema the server
//! reports, and builds the projection attached to an outgoing query.
//!
//! # Example
//!
//! ```
//! use asset_fields::{load_schema_str, validate, FieldRequest, ValidateOptions};
//!
//! let schema = load_schema_str(r#"{
//!     "generic": [
//!         {"name": "specific_data.data.hostname", "title": "Host Name", "type": "string"}
//!     ],
//!     "specific": {
//!         "active_directory_adapter": [
//!             {"name": "adapters_data.active_directory_adapter.hostname", "title": "Host Name", "type": "string"}
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let request = FieldRequest::new()
//!     .generic(["hostname"])
//!     .adapter("active_directory", ["hostname"]);
//! let fields = validate(&schema, &request, &ValidateOptions::default()).unwrap();
//!
//! assert_eq!(fields, vec![
//!     "specific_data.data.hostname",
//!     "adapters_data.active_directory_adapter.hostname",
//! ]);
//! ```
//!
//! # Name Matching
//!
//! | Tier | Requested | Matches descriptor when |
//! |------|-----------|-------------------------|
//! | 1 | `specific_data.data.hostname` | `name` is equal |
//! | 2 | `Host Name` | `title` is equal (case-sensitive) |
//! | 3 | `hostname` | `name` ends with `.hostname` |
//!
//! # Error Modes
//!
//! Unknown names either raise a [`FieldError`] or degrade to an
//! `INVALID_<name>` sentinel, selected per call:
//!
//! ```
//! use asset_fields::{validate, FieldRequest, Schema, ValidateOptions};
//!
//! let request = FieldRequest::new().generic(["nope"]);
//! let options = ValidateOptions::default().default_fields(false).fields_error(false);
//! let fields = validate(&Schema::default(), &request, &options).unwrap();
//! assert_eq!(fields, vec!["INVALID_nope"]);
//! ```

mod error;
mod loader;
mod lookup;
mod query;
mod resolver;
mod schema;
mod types;
mod validator;

pub use error::{FieldError, LoadError, LookupError};
pub use loader::{is_url, load_json, load_schema, load_schema_auto, load_schema_str};
pub use lookup::{find_by_name, NameMatch, Named};
pub use query::{and_filters, exists_filter, field_value_filter, name_filter, QueryParams};
pub use resolver::{
    find_adapter, find_field, normalize_adapter_name, qualify_field, resolve_adapter,
    resolve_field,
};
pub use schema::{FieldDescriptor, Schema};
pub use types::{
    AssetType, Resolution, Source, ValidateOptions, ADAPTER_PREFIX, ADAPTER_SUFFIX, ALL_FIELD,
    ALL_PROJECTION, GENERIC_PREFIX, GENERIC_SOURCE, INVALID_PREFIX,
};
pub use validator::{resolve_request, validate, FieldRequest};

#[cfg(feature = "remote")]
pub use loader::{fetch_known_fields, load_schema_url, ApiConfig};
