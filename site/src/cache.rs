//! In-memory response cache indexed by request URL and cache tag.
//!
//! Holds successful responses for the freshness window each request asks
//! for. `invalidate_tag` drops every entry carrying the tag, so the next
//! request for it goes back to the server.
//!
//! Every invalidation bumps a generation counter. A fetch reads the counter
//! before going to the network and passes it to `store`; if any tag was
//! invalidated in the meantime the response is returned but not kept, so a
//! request that raced a revalidation cannot put pre-revalidation content
//! back into the cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;
use wp_core::{HttpRequest, HttpResponse, TagInvalidator};

struct Entry {
    response: HttpResponse,
    tags: Vec<String>,
    stored_at: Instant,
    ttl: Duration,
}

#[derive(Default)]
pub struct TagCache {
    entries: RwLock<HashMap<String, Entry>>,
    invalidated: RwLock<Vec<String>>,
    generation: AtomicU64,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) < self.ttl
    }
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh cached response for `request`, if any.
    pub fn lookup(&self, request: &HttpRequest) -> Option<HttpResponse> {
        self.lookup_at(request, Instant::now())
    }

    fn lookup_at(&self, request: &HttpRequest, now: Instant) -> Option<HttpResponse> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&request.url)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.response.clone())
    }

    /// Current invalidation generation. Read it before sending a request
    /// and hand it back to `store`.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Keep `response` under the request's URL and tags. Failures, requests
    /// with a zero freshness window and responses fetched before the latest
    /// invalidation (`generation` is stale) are not stored. Expired entries
    /// are dropped on the way.
    pub fn store(&self, request: &HttpRequest, response: &HttpResponse, generation: u64) {
        self.store_at(request, response, generation, Instant::now());
    }

    fn store_at(&self, request: &HttpRequest, response: &HttpResponse, generation: u64, now: Instant) {
        if !response.is_success() || request.cache.revalidate == 0 {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) != generation {
            debug!(url = %request.url, "cache invalidated while fetching, not storing");
            return;
        }
        entries.retain(|_, entry| entry.is_fresh(now));
        entries.insert(
            request.url.clone(),
            Entry {
                response: response.clone(),
                tags: request.cache.tags.clone(),
                stored_at: now,
                ttl: Duration::from_secs(request.cache.revalidate),
            },
        );
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tags invalidated so far, oldest first.
    pub fn invalidations(&self) -> Vec<String> {
        self.invalidated
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TagInvalidator for TagCache {
    fn invalidate_tag(&self, tag: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        debug!(tag, dropped = before - entries.len(), "invalidated cache tag");
        self.invalidated
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tag.to_string());
    }
}
