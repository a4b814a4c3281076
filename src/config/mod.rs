//! Configuration management.
//!
//! Read once at startup and passed into the client constructor; nothing
//! mutates it afterwards.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::RetryConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Contact email sent to OpenAlex for polite-pool identification
    #[serde(default)]
    pub email: Option<String>,

    /// Optional OpenAlex API key (for premium access)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Retry policy applied to every API call
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Build configuration from the environment alone.
    ///
    /// Absence of either variable is not an error; requests simply go out
    /// without the polite-pool identity or credential.
    pub fn from_env() -> Self {
        Self {
            email: non_empty(std::env::var("OPENALEX_EMAIL").ok()),
            api_key: non_empty(std::env::var("OPENALEX_API_KEY").ok()),
            retry: RetryConfig::default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Load configuration from a file, with `OPENALEX_*` environment variables
/// layered on top.
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("OPENALEX"))
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.email.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.backoff_factor, 0.5);
    }

    #[test]
    fn test_blank_credential_treated_as_absent() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(
            non_empty(Some(" k3y ".to_string())),
            Some("k3y".to_string())
        );
        assert_eq!(non_empty(None), None);
    }
}
