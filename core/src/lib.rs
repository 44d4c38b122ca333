//! Content API client core for a headless WordPress site.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). Requests carry the cache
//! tags and freshness window the host cache needs; `revalidate` decides
//! which tags an invalidation touches.
//!
//! # Design
//! - `WordPressClient` holds only an immutable `ClientConfig`; building one
//!   without a base URL fails up front.
//! - Operations are generic over `Resource`, so every content type shares
//!   the list / get / get-by-slug shapes.
//! - Non-2xx responses become `ApiError::Http`; empty slug lookups become
//!   `ApiError::NotFound`. Nothing is retried or defaulted.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use cache::{revalidate, CacheOptions, ItemKey, TagInvalidator, DEFAULT_REVALIDATE_SECS, KNOWN_TAGS};
pub use client::WordPressClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{ListQuery, PluginFilter, PostFilter, Taxonomy, DEFAULT_PER_PAGE};
pub use types::{
    AccessLevel, Author, Category, Media, MediaDetails, MediaSize, OriginalAuthor, Page, Plugin,
    PluginCategory, PluginTag, Post, Rendered, Resource, Status, Tag, Term,
};
