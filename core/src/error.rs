//! Error types for the content API client.
//!
//! # Design
//! `ConfigError` is raised once, while building the client, and is never seen
//! per request. `ApiError` covers everything a request can hit. `NotFound` is
//! kept apart from `Http` so callers can map an empty slug lookup straight to
//! a not-found page instead of a generic failure.

use thiserror::Error;

/// The client could not be configured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("WORDPRESS_URL environment variable is not defined")]
    MissingBaseUrl,
}

/// Errors returned by `WordPressClient` parse methods and by hosts executing
/// its requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("WordPress API request failed: {message} (HTTP {status}, {url})")]
    Http {
        status: u16,
        message: String,
        url: String,
    },

    /// A slug lookup returned zero items.
    #[error("No {resource} found with slug: {slug}")]
    NotFound {
        resource: &'static str,
        slug: String,
        url: String,
    },

    /// The response body did not match the expected record shape.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl ApiError {
    /// Status code for the failure. Zero-result lookups report 404.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Decode { .. } | ApiError::Transport { .. } => None,
        }
    }

    /// The request URL that failed.
    pub fn url(&self) -> &str {
        match self {
            ApiError::Http { url, .. }
            | ApiError::NotFound { url, .. }
            | ApiError::Decode { url, .. }
            | ApiError::Transport { url, .. } => url,
        }
    }

    /// True when the target does not exist, either because a slug matched
    /// nothing or because the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
            || matches!(self, ApiError::Http { status: 404, .. })
    }
}
