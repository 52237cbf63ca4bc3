// src/config.rs
// =============================================================================
// Client configuration for one invocation.
//
// The token is read from the environment exactly once and then threaded
// explicitly into the API client. Nothing here is global or mutable, so tests
// build a fresh config with `from_lookup` instead of touching the process env.
// =============================================================================

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the bearer credential
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Root of the per-repository REST endpoints
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/repos";

/// Per-request timeout and overall deadline, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN environment variable not set")]
    MissingToken,

    #[error("invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    pub token: String,
    pub request_timeout: Duration,
}

// Never print the token
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Reads the token from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config using `lookup` to resolve environment variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Points the client at another API root (GitHub Enterprise, test servers)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_an_error() {
        let result = ClientConfig::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingToken)));

        let result = ClientConfig::from_lookup(|_| Some("   ".to_string()));
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(|key| {
            (key == TOKEN_VAR).then(|| "ghp_secret".to_string())
        })
        .unwrap();

        assert_eq!(config.token, "ghp_secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(100));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = ClientConfig::from_lookup(|_| Some("ghp_secret".to_string())).unwrap();
        let printed = format!("{:?}", config);

        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains("<redacted>"));
        assert!(printed.contains(DEFAULT_BASE_URL));
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::from_lookup(|_| Some("t".to_string()))
            .unwrap()
            .with_base_url("https://ghe.example.com/api/v3/repos/")
            .unwrap();
        assert_eq!(config.base_url, "https://ghe.example.com/api/v3/repos");

        let result = ClientConfig::from_lookup(|_| Some("t".to_string()))
            .unwrap()
            .with_base_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }
}
