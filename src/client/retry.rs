//! Retry with exponential backoff for calls to the OpenAlex API.
//!
//! The policy is fixed at client construction: a bounded number of retries,
//! exponential backoff, and a fixed set of transient HTTP statuses. Nothing
//! above the client layer retries.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::client::ClientError;

/// HTTP statuses worth retrying.
const RETRY_HTTP_CODES: [u16; 3] = [429, 500, 503];

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt
    pub max_retries: u32,
    /// Base factor for the exponential backoff, in seconds
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 0.5,
        }
    }
}

impl RetryConfig {
    /// Backoff delay before retry number `retry` (1-based):
    /// `backoff_factor * 2^(retry - 1)` seconds.
    fn delay(&self, retry: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_factor * 2f64.powi(retry as i32 - 1))
    }
}

/// Whether an error is transient and worth another attempt.
pub fn is_transient(error: &ClientError) -> bool {
    match error {
        ClientError::Network(_) => true,
        ClientError::Api { status, .. } => RETRY_HTTP_CODES.contains(status),
        _ => false,
    }
}

/// Execute an async operation, retrying transient failures per `config`.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut operation: F) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut retry = 0;

    loop {
        match operation().await {
            Ok(result) => {
                if retry > 0 {
                    tracing::info!("Request succeeded after {retry} retries");
                }
                return Ok(result);
            }
            Err(error) if is_transient(&error) && retry < config.max_retries => {
                retry += 1;
                let delay = config.delay(retry);
                tracing::debug!("Transient error ({error}), retry {retry} in {delay:?}");
                sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}
