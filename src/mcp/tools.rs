//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::client::WorksBackend;
use crate::mcp::work_tools::{
    GetBatchWorkDetailsHandler, GetCitingWorksHandler, GetReferencedWorksHandler,
    GetWorkDetailsHandler, GetWorkNgramsHandler, SearchWorksHandler, MAX_BATCH_IDS,
};

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "search_works")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry with all works tools wired to the given backend.
    pub fn from_backend(backend: Arc<dyn WorksBackend>) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };
        registry.register_work_tools(backend);
        registry
    }

    fn register_work_tools(&mut self, backend: Arc<dyn WorksBackend>) {
        let select_fields_schema = serde_json::json!({
            "type": "array",
            "items": {"type": "string"},
            "description": "List of root-level fields to return. See OpenAlex docs for options."
        });

        // 1. search_works - keyword/field search with filters and cursor pagination
        self.register(Tool {
            name: "search_works".to_string(),
            description: "Searches for OpenAlex works based on keywords and filters, returning \
                          selected fields. Supports boolean operators in the search query as per \
                          OpenAlex syntax. Uses cursor pagination."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "search_query": {
                        "type": "string",
                        "description": "Search term(s). Supports OpenAlex boolean/proximity operators, DO NOT use any quotation marks in the query."
                    },
                    "filters": {
                        "type": "object",
                        "description": "Key-value pairs for filtering. Use '|' for OR, '!' for NOT. See OpenAlex docs for keys and value formats."
                    },
                    "search_field": {
                        "type": "string",
                        "enum": ["default", "title", "abstract", "fulltext", "title_and_abstract", "display_name"],
                        "description": "Field to search within. Default searches title, abstract, and fulltext.",
                        "default": "default"
                    },
                    "select_fields": select_fields_schema.clone(),
                    "sort": {
                        "type": "object",
                        "description": "Field to sort by and direction (e.g., {\"cited_by_count\": \"desc\"})."
                    },
                    "summarize_results": {
                        "type": "boolean",
                        "description": "If true (default), returns a condensed summary of each work (id, doi, title, year, authors, citation count, venue, oa_url, abstract), potentially filtered by select_fields.",
                        "default": true
                    },
                    "per_page": {
                        "type": "integer",
                        "description": "Number of results per page (1-200).",
                        "default": 25
                    },
                    "cursor": {
                        "type": "string",
                        "description": "Cursor for pagination. Use '*' for the first page.",
                        "default": "*"
                    }
                },
                "required": ["search_query"]
            }),
            handler: Arc::new(SearchWorksHandler {
                backend: backend.clone(),
            }),
        });

        // 2. get_work_details - single-record fetch with abstract reconstruction
        self.register(Tool {
            name: "get_work_details".to_string(),
            description: "Retrieves detailed information for a specific OpenAlex work by its ID \
                          (OpenAlex ID URL, DOI URL, PMID URL, MAG ID). Handles abstract \
                          generation, no need to request abstract_inverted_index, simply \
                          retrieve abstract."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "work_id": {
                        "type": "string",
                        "description": "Identifier for the work (OpenAlex ID URL, DOI URL, PMID URL, MAG ID)."
                    },
                    "select_fields": select_fields_schema.clone()
                },
                "required": ["work_id"]
            }),
            handler: Arc::new(GetWorkDetailsHandler {
                backend: backend.clone(),
            }),
        });

        // 3. get_batch_work_details - OR-filtered lookup of up to 50 IDs
        self.register(Tool {
            name: "get_batch_work_details".to_string(),
            description: format!(
                "Retrieves detailed information for a list of OpenAlex works by their IDs. \
                 Limited to a maximum of {MAX_BATCH_IDS} IDs per request due to API limitations."
            ),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "work_ids": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": format!("A list of OpenAlex work identifiers (max {MAX_BATCH_IDS}).")
                    },
                    "select_fields": select_fields_schema.clone()
                },
                "required": ["work_ids"]
            }),
            handler: Arc::new(GetBatchWorkDetailsHandler {
                backend: backend.clone(),
            }),
        });

        // 4. get_referenced_works - outgoing citations
        self.register(Tool {
            name: "get_referenced_works".to_string(),
            description: "Retrieves the list of OpenAlex IDs cited *by* a specific OpenAlex work \
                          (outgoing citations). Returns only the list of IDs. Use \
                          get_work_details for more info on each reference."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "work_id": {
                        "type": "string",
                        "description": "OpenAlex ID of the *citing* work (the one whose references you want)."
                    }
                },
                "required": ["work_id"]
            }),
            handler: Arc::new(GetReferencedWorksHandler {
                backend: backend.clone(),
            }),
        });

        // 5. get_citing_works - incoming citations with the search shaping contract
        self.register(Tool {
            name: "get_citing_works".to_string(),
            description: "Retrieves the list of works that *cite* a specific OpenAlex work \
                          (incoming citations). Uses cursor pagination."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "work_id": {
                        "type": "string",
                        "description": "OpenAlex ID of the *cited* work (the one you want citations for)."
                    },
                    "select_fields": select_fields_schema.clone(),
                    "summarize_results": {
                        "type": "boolean",
                        "description": "If true (default), returns a condensed summary of each citing work.",
                        "default": true
                    },
                    "per_page": {
                        "type": "integer",
                        "description": "Number of results per page (1-200).",
                        "default": 25
                    },
                    "cursor": {
                        "type": "string",
                        "description": "Cursor for pagination.",
                        "default": "*"
                    }
                },
                "required": ["work_id"]
            }),
            handler: Arc::new(GetCitingWorksHandler {
                backend: backend.clone(),
            }),
        });

        // 6. get_work_ngrams - full-text n-gram passthrough
        self.register(Tool {
            name: "get_work_ngrams".to_string(),
            description: "Retrieves the N-grams (word proximity information) for a specific \
                          OpenAlex work's full text."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "work_id": {
                        "type": "string",
                        "description": "OpenAlex ID of the work."
                    }
                },
                "required": ["work_id"]
            }),
            handler: Arc::new(GetWorkNgramsHandler { backend }),
        });
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}
