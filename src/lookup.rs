//! Name lookup over named server objects (saved queries, enforcements, labels).

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::LookupError;
use crate::query::name_filter;

/// Anything with a display name. Objects without one are never matched.
pub trait Named {
    fn name(&self) -> Option<&str>;
}

impl Named for String {
    fn name(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl Named for &str {
    fn name(&self) -> Option<&str> {
        Some(*self)
    }
}

/// Server rows carry their name in a string `name` attribute.
impl Named for Value {
    fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }
}

/// How a requested name is compared with object names.
#[derive(Debug, Clone)]
pub enum NameMatch {
    /// Case-sensitive equality.
    Exact(String),
    /// Case-insensitive regex search.
    Regex(Regex),
}

impl NameMatch {
    pub fn exact(name: impl Into<String>) -> Self {
        NameMatch::Exact(name.into())
    }

    /// Compile a case-insensitive pattern.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::InvalidPattern` if the pattern does not compile.
    pub fn regex(pattern: &str) -> Result<Self, LookupError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(NameMatch::Regex)
            .map_err(|source| LookupError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            NameMatch::Exact(expected) => expected == name,
            NameMatch::Regex(re) => re.is_match(name),
        }
    }

    /// Equivalent server-side filter, used in diagnostics.
    pub fn to_filter(&self) -> String {
        match self {
            NameMatch::Exact(expected) => name_filter(expected, false),
            NameMatch::Regex(re) => name_filter(re.as_str(), true),
        }
    }
}

/// Find objects by name.
///
/// Returns every match in input order. With `only1`, exactly one match is
/// required.
///
/// # Errors
///
/// Returns `LookupError::ObjectNotFound` when nothing matches, or when
/// `only1` is set and more than one object matches.
pub fn find_by_name<'a, T: Named>(
    items: &'a [T],
    matcher: &NameMatch,
    only1: bool,
    object_type: &str,
) -> Result<Vec<&'a T>, LookupError> {
    let found: Vec<&T> = items
        .iter()
        .filter(|item| item.name().is_some_and(|name| matcher.is_match(name)))
        .collect();

    debug!(
        object_type,
        filter = %matcher.to_filter(),
        matches = found.len(),
        "name lookup"
    );

    if found.is_empty() || (only1 && found.len() > 1) {
        return Err(LookupError::ObjectNotFound {
            object_type: object_type.to_string(),
            value_type: "query".to_string(),
            value: matcher.to_filter(),
        });
    }

    Ok(found)
}
