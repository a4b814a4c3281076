//! Condensed summaries of work records for token-constrained consumers.

use serde_json::{Map, Value};

/// Maximum number of author names carried into a summary.
const MAX_SUMMARY_AUTHORS: usize = 6;

/// Condense a normalized work record into a fixed summary.
///
/// Candidate fields: `id`, `doi`, `title`, `publication_year`, `authors`,
/// `cited_by_count`, `venue`, `oa_url`, `abstract`. When `requested` is
/// given the candidates are intersected with it. Null-valued fields are
/// always omitted, so the summary stays sparse.
pub fn summarize_work(record: &Map<String, Value>, requested: Option<&Vec<String>>) -> Map<String, Value> {
    let mut candidates = Map::new();

    for key in ["id", "doi", "title", "publication_year", "cited_by_count"] {
        candidates.insert(
            key.to_string(),
            record.get(key).cloned().unwrap_or(Value::Null),
        );
    }

    candidates.insert("authors".to_string(), author_names(record));
    candidates.insert("venue".to_string(), venue_name(record));
    candidates.insert("oa_url".to_string(), best_oa_url(record));
    candidates.insert(
        "abstract".to_string(),
        record.get("abstract").cloned().unwrap_or(Value::Null),
    );

    candidates
        .into_iter()
        .filter(|(key, value)| {
            !value.is_null() && requested.map_or(true, |fields| fields.iter().any(|f| f == key))
        })
        .collect()
}

/// Author display names in original authorship order, capped at
/// [`MAX_SUMMARY_AUTHORS`]. Authors without a display name are skipped
/// without a placeholder.
fn author_names(record: &Map<String, Value>) -> Value {
    let names: Vec<Value> = record
        .get("authorships")
        .and_then(Value::as_array)
        .map(|authorships| {
            authorships
                .iter()
                .filter_map(|authorship| {
                    authorship
                        .get("author")
                        .and_then(|author| author.get("display_name"))
                        .and_then(Value::as_str)
                        .map(|name| Value::String(name.to_string()))
                })
                .take(MAX_SUMMARY_AUTHORS)
                .collect()
        })
        .unwrap_or_default();

    Value::Array(names)
}

/// Venue display name from the primary location's source sub-record.
fn venue_name(record: &Map<String, Value>) -> Value {
    record
        .get("primary_location")
        .and_then(|location| location.get("source"))
        .and_then(|source| source.get("display_name"))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Best open-access URL: prefer the best OA location's PDF, fall back to
/// the general OA URL.
fn best_oa_url(record: &Map<String, Value>) -> Value {
    let pdf_url = record
        .get("best_oa_location")
        .and_then(|location| location.get("pdf_url"))
        .filter(|url| !url.is_null());

    if let Some(url) = pdf_url {
        return url.clone();
    }

    record
        .get("open_access")
        .and_then(|oa| oa.get("oa_url"))
        .cloned()
        .unwrap_or(Value::Null)
}
