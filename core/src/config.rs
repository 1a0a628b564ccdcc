//! Client configuration.
//!
//! Credentials are an API key and secret pair. `LunoConfig::from_env` reads
//! them from `LUNO_API_KEY` / `LUNO_SECRET_KEY`, with `LUNO_BASE_URL`
//! optionally overriding the production endpoint.

use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.luno.io/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_KEY: &str = "LUNO_API_KEY";
pub const ENV_SECRET_KEY: &str = "LUNO_SECRET_KEY";
pub const ENV_BASE_URL: &str = "LUNO_BASE_URL";

/// Immutable connection settings shared by every entity client.
#[derive(Clone)]
pub struct LunoConfig {
    pub base_url: String,
    pub api_key: String,
    pub secret_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl LunoConfig {
    /// Configuration for the production API with the given credentials.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("luno-rust/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Build a configuration from `LUNO_API_KEY`, `LUNO_SECRET_KEY` and
    /// (optionally) `LUNO_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_API_KEY} is not set")))?;
        let secret_key = lookup(ENV_SECRET_KEY)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::Config(format!("{ENV_SECRET_KEY} is not set")))?;

        let config = Self::new(api_key, secret_key);
        match lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            Some(url) => Ok(config.with_base_url(url)),
            None => Ok(config),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject configurations that could never authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ApiError::Config("api key is empty".to_string()));
        }
        if self.secret_key.is_empty() {
            return Err(ApiError::Config("secret key is empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ApiError::Config(format!(
                "base url must be http(s): {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

// The secret never appears in logs.
impl fmt::Debug for LunoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LunoConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
