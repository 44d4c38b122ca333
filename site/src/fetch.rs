//! Executes core requests over HTTP, in front of the tag cache.

use std::sync::Arc;

use tracing::{debug, warn};
use wp_core::{ApiError, HttpRequest, HttpResponse};

use crate::cache::TagCache;

#[derive(Clone)]
pub struct Fetcher {
    http: reqwest::Client,
    cache: Arc<TagCache>,
}

impl Fetcher {
    pub fn new(cache: Arc<TagCache>) -> Self {
        Self {
            http: reqwest::Client::new(),
            cache,
        }
    }

    /// Serve `request` from the cache when fresh, otherwise from the network.
    ///
    /// Non-2xx responses are returned as data for the core to classify; only
    /// a failure to get any response at all is an error here.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        if let Some(hit) = self.cache.lookup(&request) {
            debug!(url = %request.url, "cache hit");
            return Ok(hit);
        }
        let generation = self.cache.generation();

        let mut builder = self.http.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.send().await.map_err(|e| transport(&request, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport(&request, e))?;

        let response = HttpResponse {
            url: request.url.clone(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        };
        if response.is_success() {
            debug!(url = %request.url, tags = ?request.cache.tags, "fetched");
            self.cache.store(&request, &response, generation);
        } else {
            warn!(url = %request.url, status = response.status, "content API returned an error status");
        }
        Ok(response)
    }
}

fn transport(request: &HttpRequest, err: reqwest::Error) -> ApiError {
    warn!(url = %request.url, error = %err, "content API unreachable");
    ApiError::Transport {
        url: request.url.clone(),
        message: err.to_string(),
    }
}
