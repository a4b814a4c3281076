//! Normalization of raw dataset records into uniform field mappings.

use serde_json::{Map, Value};

use crate::works::abstract_text::reconstruct_abstract;

/// Convert a raw result item into a field mapping.
///
/// The dataset client hands back untyped JSON; anything that is not an
/// object has no conversion path and is dropped with a diagnostic, so a
/// single malformed item never fails a whole batch.
///
/// When `attach_abstract` is set (the caller fetched the unabridged record),
/// the `abstract` key is resolved from the inverted index before any
/// downstream projection can discard it. Reconstruction failure is
/// non-fatal and leaves `abstract` as null.
pub fn normalize(raw: Value, attach_abstract: bool) -> Option<Map<String, Value>> {
    let mut record = match raw {
        Value::Object(map) => map,
        other => {
            tracing::warn!("Skipping non-mapping result item: {}", type_name(&other));
            return None;
        }
    };

    if attach_abstract {
        attach_reconstructed_abstract(&mut record);
    }

    Some(record)
}

/// Resolve `abstract` from the record's inverted index, in place.
pub fn attach_reconstructed_abstract(record: &mut Map<String, Value>) {
    match reconstruct_abstract(record.get("abstract_inverted_index")) {
        Some(text) => {
            record.insert("abstract".to_string(), Value::String(text));
        }
        None => {
            let id = record.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
            tracing::warn!("Abstract could not be reconstructed for {id}, index likely missing");
            record.insert("abstract".to_string(), Value::Null);
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
