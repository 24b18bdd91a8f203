//! Filter expressions and request parameters for asset queries.

use serde::Serialize;

/// Filter matching a `name` attribute, by equality or case-insensitive regex.
pub fn name_filter(name: &str, regex: bool) -> String {
    field_value_filter("name", name, regex)
}

/// Filter matching a field path against a value.
///
/// `regex` produces `field == regex("value", "i")`, otherwise `field == "value"`.
pub fn field_value_filter(field: &str, value: &str, regex: bool) -> String {
    let value = escape(value);
    if regex {
        format!("{} == regex(\"{}\", \"i\")", field, value)
    } else {
        format!("{} == \"{}\"", field, value)
    }
}

/// Filter matching assets where a field is present and non-empty.
pub fn exists_filter(field: &str) -> String {
    format!("({} == ({{\"$exists\":true,\"$ne\": \"\"}}))", field)
}

/// Combine filters with `and`, skipping empty ones.
pub fn and_filters<I, S>(filters: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    filters
        .into_iter()
        .filter(|f| !f.as_ref().is_empty())
        .map(|f| f.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Query string parameters for a page of assets.
///
/// Zero `skip`/`limit` and empty `filter`/`fields` are left out, matching
/// what the server treats as "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Comma-joined canonical field paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        let filter = filter.into();
        self.filter = (!filter.is_empty()).then_some(filter);
        self
    }

    /// Attach a projection, typically the output of [`validate`](crate::validate).
    pub fn fields<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        let joined = fields
            .iter()
            .map(|f| f.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.fields = (!joined.is_empty()).then_some(joined);
        self
    }

    pub fn row_start(mut self, row_start: u64) -> Self {
        self.skip = (row_start > 0).then_some(row_start);
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.limit = (page_size > 0).then_some(page_size);
        self
    }
}
