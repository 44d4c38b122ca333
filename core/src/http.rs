//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core crate builds
//! `HttpRequest` values and parses `HttpResponse` values; the host executes
//! the round-trip and owns whatever cache sits in front of the network.
//! Each request carries the `CacheOptions` the host needs to store and later
//! invalidate the response.

use crate::cache::CacheOptions;

/// HTTP method for a request. The content API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// An HTTP request described as plain data.
///
/// Built by `WordPressClient::build_*` methods. `url` is absolute and
/// already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub cache: CacheOptions,
}

/// An HTTP response described as plain data.
///
/// `url` is the request URL it answers, echoed into errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub url: String,
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
