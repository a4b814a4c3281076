//! Root-level field selection for work records.

use serde_json::{Map, Value};

/// Identifier fields retained by every projection, requested or not.
const REQUIRED_ID_FIELDS: [&str; 2] = ["id", "doi"];

/// Project a record down to the requested root-level fields.
///
/// The identifier fields `id` and `doi` are always kept when present.
/// Callers signal "no selection requested" with `None` (or an empty list)
/// and skip this call entirely; passing a non-empty list here always
/// projects.
pub fn select_fields(record: &Map<String, Value>, requested: &[String]) -> Map<String, Value> {
    record
        .iter()
        .filter(|(key, _)| {
            requested.iter().any(|f| f == *key) || REQUIRED_ID_FIELDS.contains(&key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Normalize an optional requested-field list: an omitted or empty list
/// means no selection was requested.
pub fn requested_or_none(requested: Option<&Vec<String>>) -> Option<&Vec<String>> {
    requested.filter(|fields| !fields.is_empty())
}
