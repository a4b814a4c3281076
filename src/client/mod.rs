//! OpenAlex REST client — the external dataset collaborator.
//!
//! The tool handlers only see the [`WorksBackend`] trait; [`OpenAlexClient`]
//! is its production implementation. Retry policy, contact identity, and the
//! API credential are fixed at construction and never mutated afterwards.

mod query;
mod retry;

pub use query::{SearchField, WorksQuery};
pub use retry::{with_retry, RetryConfig};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;

const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// Errors from the dataset client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the API
    #[error("OpenAlex API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Identifier resolved to no record
    #[error("Work not found: {0}")]
    NotFound(String),

    /// Malformed request parameters, reported before any network call
    #[error("{0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// Pagination metadata block returned alongside every listing page.
///
/// `next_cursor` is opaque; pass it back unmodified to continue. Null or
/// absent means the terminal page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// One page of a `/works` listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorksPage {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub meta: PageMeta,
}

/// The dataset-access seam: everything the query operations need from
/// OpenAlex. Implemented by [`OpenAlexClient`] and by test mocks.
#[async_trait]
pub trait WorksBackend: Send + Sync + std::fmt::Debug {
    /// Execute exactly one page of a listing query.
    async fn list(
        &self,
        query: &WorksQuery,
        per_page: u32,
        cursor: Option<&str>,
    ) -> Result<WorksPage, ClientError>;

    /// Fetch a single work by identifier, optionally with field selection
    /// pushed down.
    async fn get(&self, work_id: &str, select: Option<&[String]>) -> Result<Value, ClientError>;

    /// Fetch the n-gram structure for a work's full text.
    async fn ngrams(&self, work_id: &str) -> Result<Value, ClientError>;
}

/// HTTP client for the OpenAlex works API.
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
    http: Client,
    base_url: String,
    email: Option<String>,
    api_key: Option<String>,
    retry: RetryConfig,
}

impl OpenAlexClient {
    /// Create a client from process configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, OPENALEX_API_BASE)
    }

    /// Create a client against an alternative base URL (used by tests).
    pub fn with_base_url(config: &Config, base_url: &str) -> Self {
        let user_agent = match config.email {
            Some(ref email) => format!(
                "{}/{} (mailto:{})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                email
            ),
            None => format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        };

        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_key: config.api_key.clone(),
            retry: config.retry,
        }
    }

    /// Identity parameters appended to every request: `mailto` for the
    /// polite pool and `api_key` when configured.
    fn identity_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(ref email) = self.email {
            params.push(("mailto".to_string(), email.clone()));
        }
        if let Some(ref key) = self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        params
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(String, String)],
        not_found_id: &str,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let mut all_params = params.to_vec();
        all_params.extend(self.identity_params());

        // References are Copy, so the retry closure can hand a fresh future
        // borrowing them on every attempt.
        let http = &self.http;
        let url = &url;
        let all_params = &all_params;
        with_retry(self.retry, move || async move {
            let response = http.get(url.as_str()).query(all_params).send().await?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound(not_found_id.to_string()));
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            response
                .json::<Value>()
                .await
                .map_err(|e| ClientError::Parse(format!("JSON: {e}")))
        })
        .await
    }
}

#[async_trait]
impl WorksBackend for OpenAlexClient {
    async fn list(
        &self,
        query: &WorksQuery,
        per_page: u32,
        cursor: Option<&str>,
    ) -> Result<WorksPage, ClientError> {
        let mut params = query.to_params();
        params.push(("per-page".to_string(), per_page.to_string()));
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }

        let body = self.get_json("/works", &params, "<listing>").await?;
        serde_json::from_value(body).map_err(|e| ClientError::Parse(format!("JSON: {e}")))
    }

    async fn get(&self, work_id: &str, select: Option<&[String]>) -> Result<Value, ClientError> {
        let mut params = Vec::new();
        if let Some(fields) = select {
            params.push(("select".to_string(), fields.join(",")));
        }

        self.get_json(&format!("/works/{work_id}"), &params, work_id)
            .await
    }

    async fn ngrams(&self, work_id: &str) -> Result<Value, ClientError> {
        self.get_json(&format!("/works/{work_id}/ngrams"), &[], work_id)
            .await
    }
}
