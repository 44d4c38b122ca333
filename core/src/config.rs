//! Client configuration.

use crate::error::ConfigError;

/// Name of the environment variable holding the API base URL.
pub const BASE_URL_VAR: &str = "WORDPRESS_URL";

/// Immutable, process-wide client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
}

impl ClientConfig {
    /// Validate `base_url`. Blank values are rejected; a trailing `/` is
    /// stripped.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Read `WORDPRESS_URL` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the base URL through `lookup`, which stands in for the
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(BASE_URL_VAR).ok_or(ConfigError::MissingBaseUrl)?;
        Self::new(&value)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
