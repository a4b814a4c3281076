//! Tool handlers for the six OpenAlex works operations.
//!
//! Every handler is stateless across calls and shares the same failure
//! contract: nothing propagates to the MCP runtime as a protocol error.
//! Failures are logged with the operation name and identifying arguments,
//! then reported inside the response mapping under an `error` key, with the
//! operation's normal result keys present but empty so callers always see a
//! consistent shape.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::tools::ToolHandler;
use crate::client::{ClientError, SearchField, WorksBackend, WorksQuery};
use crate::works::{
    normalize, requested_or_none, select_fields, strip_id_prefix, summarize_work,
};

/// Maximum identifiers accepted by a single batch lookup.
pub const MAX_BATCH_IDS: usize = 50;

/// Fields pushed down for citing-works listings when the caller neither
/// summarizes nor selects, to avoid an unbounded full fetch.
const DEFAULT_CITING_FIELDS: [&str; 9] = [
    "id",
    "doi",
    "title",
    "publication_year",
    "authorships",
    "cited_by_count",
    "primary_location",
    "open_access",
    "abstract",
];

fn default_true() -> bool {
    true
}

fn default_per_page() -> u32 {
    25
}

fn default_cursor() -> Option<String> {
    Some("*".to_string())
}

fn validate_per_page(per_page: u32) -> Result<(), ClientError> {
    if (1..=200).contains(&per_page) {
        Ok(())
    } else {
        Err(ClientError::InvalidRequest(format!(
            "per_page must be between 1 and 200, got {per_page}"
        )))
    }
}

fn contains(fields: &[String], name: &str) -> bool {
    fields.iter().any(|f| f == name)
}

/// Error envelope for the paginated listing operations.
fn page_error(message: String) -> Value {
    json!({"error": message, "results": [], "meta": {}})
}

/// Page envelope: results plus the pagination metadata callers need to
/// continue with the next cursor.
fn page_envelope(results: Vec<Value>, meta: crate::client::PageMeta, per_page: u32) -> Value {
    json!({
        "results": results,
        "meta": {
            "count": meta.count,
            "per_page": meta.per_page.unwrap_or(per_page),
            "next_cursor": meta.next_cursor,
        },
    })
}

// ===== search_works =====

#[derive(Debug, Deserialize)]
struct SearchWorksParams {
    search_query: String,
    #[serde(default)]
    filters: Option<Map<String, Value>>,
    #[serde(default = "SearchWorksParams::default_field")]
    search_field: String,
    #[serde(default)]
    select_fields: Option<Vec<String>>,
    #[serde(default)]
    sort: Option<Map<String, Value>>,
    #[serde(default = "default_true")]
    summarize_results: bool,
    #[serde(default = "default_per_page")]
    per_page: u32,
    #[serde(default = "default_cursor")]
    cursor: Option<String>,
}

impl SearchWorksParams {
    fn default_field() -> String {
        "default".to_string()
    }
}

/// Handler for keyword/field search over works, one page at a time.
#[derive(Debug)]
pub struct SearchWorksHandler {
    pub backend: Arc<dyn WorksBackend>,
}

impl SearchWorksHandler {
    async fn run(&self, params: &SearchWorksParams) -> Result<Value, ClientError> {
        let field = SearchField::parse(&params.search_field)?;
        validate_per_page(params.per_page)?;

        let select = requested_or_none(params.select_fields.as_ref());

        let mut query = WorksQuery::new().search(&params.search_query, field);
        if let Some(filters) = params.filters.as_ref() {
            query = query.filters(filters);
        }
        if let Some(sort) = params.sort.as_ref() {
            query = query.sort(sort);
        }

        // Selection is pushed to the API only when summaries are off;
        // summarizing needs the full record so abstracts and summary source
        // fields stay available.
        let pushdown = match select {
            Some(fields) if !params.summarize_results => {
                query = query.select(fields);
                true
            }
            _ => false,
        };

        let page = self
            .backend
            .list(&query, params.per_page, params.cursor.as_deref())
            .await?;

        let records: Vec<Map<String, Value>> = page
            .results
            .into_iter()
            .filter_map(|raw| normalize(raw, !pushdown))
            .collect();

        let results: Vec<Value> = if params.summarize_results {
            records
                .iter()
                .map(|record| Value::Object(summarize_work(record, select)))
                .collect()
        } else {
            records.into_iter().map(Value::Object).collect()
        };

        Ok(page_envelope(results, page.meta, params.per_page))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchWorksHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let params: SearchWorksParams = match serde_json::from_value(args) {
            Ok(params) => params,
            Err(e) => return Ok(page_error(format!("Invalid arguments: {e}"))),
        };

        match self.run(&params).await {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                tracing::error!("search_works failed for query '{}': {}", params.search_query, e);
                Ok(page_error(e.to_string()))
            }
        }
    }
}

// ===== get_work_details =====

#[derive(Debug, Deserialize)]
struct GetWorkDetailsParams {
    work_id: String,
    #[serde(default)]
    select_fields: Option<Vec<String>>,
}

/// Handler for fetching one work, with abstract reconstruction when the
/// full record (or the abstract itself) is wanted.
#[derive(Debug)]
pub struct GetWorkDetailsHandler {
    pub backend: Arc<dyn WorksBackend>,
}

impl GetWorkDetailsHandler {
    async fn run(&self, params: &GetWorkDetailsParams) -> Result<Value, ClientError> {
        let select = requested_or_none(params.select_fields.as_ref());

        if let Some(fields) = select {
            if !contains(fields, "abstract") {
                // Abstract not wanted: push selection down, always keeping
                // the identifier fields.
                let mut query_select = fields.clone();
                for id_field in ["id", "doi"] {
                    if !contains(&query_select, id_field) {
                        query_select.push(id_field.to_string());
                    }
                }
                return self.backend.get(&params.work_id, Some(&query_select)).await;
            }
        }

        let raw = self.backend.get(&params.work_id, None).await?;
        let mut record = normalize(raw, true).ok_or_else(|| {
            ClientError::Parse(format!("Work {} response was not an object", params.work_id))
        })?;

        if let Some(fields) = select {
            record = select_fields(&record, fields);
        }

        // The reconstructed abstract supersedes the raw index unless the
        // caller asked for the index explicitly.
        let abstract_resolved = record.get("abstract").map_or(false, |v| !v.is_null());
        let index_requested = select.map_or(false, |f| contains(f, "abstract_inverted_index"));
        if abstract_resolved && !index_requested {
            record.remove("abstract_inverted_index");
        }

        Ok(Value::Object(record))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetWorkDetailsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let params: GetWorkDetailsParams = match serde_json::from_value(args) {
            Ok(params) => params,
            Err(e) => return Ok(json!({"error": format!("Invalid arguments: {e}")})),
        };

        match self.run(&params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::error!("get_work_details failed for ID {}: {}", params.work_id, e);
                Ok(json!({"error": e.to_string()}))
            }
        }
    }
}

// ===== get_batch_work_details =====

#[derive(Debug, Deserialize)]
struct GetBatchWorkDetailsParams {
    work_ids: Vec<String>,
    #[serde(default)]
    select_fields: Option<Vec<String>>,
}

/// Handler for fetching up to [`MAX_BATCH_IDS`] works in one OR-filtered
/// dataset call.
#[derive(Debug)]
pub struct GetBatchWorkDetailsHandler {
    pub backend: Arc<dyn WorksBackend>,
}

impl GetBatchWorkDetailsHandler {
    async fn run(&self, params: &GetBatchWorkDetailsParams) -> Result<Value, ClientError> {
        if params.work_ids.is_empty() {
            return Err(ClientError::InvalidRequest(
                "work_ids list cannot be empty.".to_string(),
            ));
        }
        if params.work_ids.len() > MAX_BATCH_IDS {
            return Err(ClientError::InvalidRequest(format!(
                "Too many work_ids provided. Maximum is {MAX_BATCH_IDS}."
            )));
        }

        let cleaned: Vec<&str> = params
            .work_ids
            .iter()
            .map(|id| strip_id_prefix(id))
            .collect();

        let select = requested_or_none(params.select_fields.as_ref());
        let abstract_requested = select.map_or(false, |fields| contains(fields, "abstract"));
        let index_requested = select
            .map_or(false, |fields| contains(fields, "abstract_inverted_index"));

        // The abstract itself is not an API field: replace it in the
        // pushed-down selection with the inverted index it is built from.
        let api_select: Option<Vec<String>> = select.map(|fields| {
            let mut api_fields: Vec<String> = fields
                .iter()
                .filter(|f| f.as_str() != "abstract")
                .cloned()
                .collect();
            if abstract_requested && !contains(&api_fields, "abstract_inverted_index") {
                api_fields.push("abstract_inverted_index".to_string());
            }
            if !contains(&api_fields, "id") {
                api_fields.insert(0, "id".to_string());
            }
            api_fields
        });

        let mut query = WorksQuery::new().filter("ids.openalex", &cleaned.join("|"));
        if let Some(ref fields) = api_select {
            query = query.select(fields);
        }

        // One call sized to the id list, so every match comes back on the
        // single page.
        let page = self
            .backend
            .list(&query, cleaned.len() as u32, None)
            .await?;

        let attach_abstract = abstract_requested || select.is_none();
        let mut works = Vec::with_capacity(page.results.len());

        for raw in page.results {
            let Some(record) = normalize(raw, attach_abstract) else {
                continue;
            };

            let mut result = match api_select {
                Some(ref api_fields) => {
                    let mut local_fields = api_fields.clone();
                    if abstract_requested {
                        local_fields.push("abstract".to_string());
                    }
                    select_fields(&record, &local_fields)
                }
                None => record,
            };

            if !index_requested {
                result.remove("abstract_inverted_index");
            }

            works.push(Value::Object(result));
        }

        Ok(json!({"works": works}))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetBatchWorkDetailsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let params: GetBatchWorkDetailsParams = match serde_json::from_value(args) {
            Ok(params) => params,
            Err(e) => {
                return Ok(json!({"error": format!("Invalid arguments: {e}"), "works": []}))
            }
        };

        match self.run(&params).await {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                tracing::error!(
                    "get_batch_work_details failed for {} IDs: {}",
                    params.work_ids.len(),
                    e
                );
                Ok(json!({"error": e.to_string(), "works": []}))
            }
        }
    }
}

// ===== get_referenced_works =====

#[derive(Debug, Deserialize)]
struct GetReferencedWorksParams {
    work_id: String,
}

/// Handler for listing a work's outgoing citation identifiers.
#[derive(Debug)]
pub struct GetReferencedWorksHandler {
    pub backend: Arc<dyn WorksBackend>,
}

impl GetReferencedWorksHandler {
    async fn run(&self, params: &GetReferencedWorksParams) -> Result<Value, ClientError> {
        let work_id = strip_id_prefix(&params.work_id);
        let select = vec!["referenced_works".to_string()];
        let work = self.backend.get(work_id, Some(&select)).await?;

        let referenced = work
            .get("referenced_works")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(json!({"referenced_work_ids": referenced}))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetReferencedWorksHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let params: GetReferencedWorksParams = match serde_json::from_value(args) {
            Ok(params) => params,
            Err(e) => {
                return Ok(
                    json!({"error": format!("Invalid arguments: {e}"), "referenced_work_ids": []}),
                )
            }
        };

        match self.run(&params).await {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                tracing::error!("get_referenced_works failed for ID {}: {}", params.work_id, e);
                Ok(json!({"error": e.to_string(), "referenced_work_ids": []}))
            }
        }
    }
}

// ===== get_citing_works =====

#[derive(Debug, Deserialize)]
struct GetCitingWorksParams {
    work_id: String,
    #[serde(default)]
    select_fields: Option<Vec<String>>,
    #[serde(default = "default_true")]
    summarize_results: bool,
    #[serde(default = "default_per_page")]
    per_page: u32,
    #[serde(default = "default_cursor")]
    cursor: Option<String>,
}

/// Handler for listing works that cite a given work (incoming citations).
#[derive(Debug)]
pub struct GetCitingWorksHandler {
    pub backend: Arc<dyn WorksBackend>,
}

impl GetCitingWorksHandler {
    async fn run(&self, params: &GetCitingWorksParams) -> Result<Value, ClientError> {
        validate_per_page(params.per_page)?;

        let work_id = strip_id_prefix(&params.work_id);
        let select = requested_or_none(params.select_fields.as_ref());

        let mut query = WorksQuery::new().filter("cites", work_id);

        if !params.summarize_results {
            match select {
                Some(fields) => query = query.select(fields),
                None => {
                    // No summary and no selection would pull unbounded full
                    // records; fall back to the summary source fields.
                    let defaults: Vec<String> = DEFAULT_CITING_FIELDS
                        .iter()
                        .map(|f| f.to_string())
                        .collect();
                    query = query.select(&defaults);
                }
            }
        }

        let page = self
            .backend
            .list(&query, params.per_page, params.cursor.as_deref())
            .await?;

        let records: Vec<Map<String, Value>> = page
            .results
            .into_iter()
            .filter_map(|raw| normalize(raw, params.summarize_results))
            .collect();

        let results: Vec<Value> = if params.summarize_results {
            records
                .iter()
                .map(|record| Value::Object(summarize_work(record, select)))
                .collect()
        } else {
            records.into_iter().map(Value::Object).collect()
        };

        Ok(page_envelope(results, page.meta, params.per_page))
    }
}

#[async_trait::async_trait]
impl ToolHandler for GetCitingWorksHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let params: GetCitingWorksParams = match serde_json::from_value(args) {
            Ok(params) => params,
            Err(e) => return Ok(page_error(format!("Invalid arguments: {e}"))),
        };

        match self.run(&params).await {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                tracing::error!("get_citing_works failed for ID {}: {}", params.work_id, e);
                Ok(page_error(e.to_string()))
            }
        }
    }
}

// ===== get_work_ngrams =====

#[derive(Debug, Deserialize)]
struct GetWorkNgramsParams {
    work_id: String,
}

/// Handler for retrieving a work's full-text n-gram structure, passed
/// through from the API unmodified.
#[derive(Debug)]
pub struct GetWorkNgramsHandler {
    pub backend: Arc<dyn WorksBackend>,
}

#[async_trait::async_trait]
impl ToolHandler for GetWorkNgramsHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let params: GetWorkNgramsParams = match serde_json::from_value(args) {
            Ok(params) => params,
            Err(e) => return Ok(json!({"error": format!("Invalid arguments: {e}")})),
        };

        let work_id = strip_id_prefix(&params.work_id).to_string();
        match self.backend.ngrams(&work_id).await {
            Ok(ngrams) => Ok(ngrams),
            Err(ClientError::NotFound(_)) => {
                tracing::warn!("No n-grams available for work ID {work_id}");
                Ok(json!({"error": format!("N-grams not found for work ID {work_id}.")}))
            }
            Err(e) => {
                tracing::error!("get_work_ngrams failed for ID {}: {}", work_id, e);
                Ok(json!({"error": e.to_string()}))
            }
        }
    }
}
