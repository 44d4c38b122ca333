//! Stateless request builder and response parser for the WordPress REST API.
//!
//! # Design
//! `WordPressClient` holds only its `ClientConfig` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` (URL, headers, cache tags) and a `parse_*`
//! method that consumes the matching `HttpResponse`. The host executes the
//! round-trip in between, so the core stays deterministic and I/O free.
//!
//! Every operation is generic over `Resource`, which gives each content type
//! the same four shapes: list, get by id, get by slug, and related-entity
//! lookup (a get by id on the related type).

use serde::de::DeserializeOwned;

use crate::cache::{CacheOptions, ItemKey};
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{encode, ListQuery};
use crate::types::Resource;

/// REST namespace every resource lives under.
pub const API_PREFIX: &str = "/wp-json/wp/v2";

pub const USER_AGENT: &str = "wp-site content client";

#[derive(Debug, Clone)]
pub struct WordPressClient {
    config: ClientConfig,
}

impl WordPressClient {
    /// Build a client for `base_url`. A blank URL is a configuration error.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_config(ClientConfig::new(base_url)?))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Build a client from `WORDPRESS_URL`, failing immediately when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::from_config(ClientConfig::from_env()?))
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn build_list<R: Resource>(&self, query: &ListQuery) -> HttpRequest {
        self.request(
            format!("{}?{}", self.collection_url::<R>(), query.to_query_string()),
            CacheOptions::for_collection(R::TAG),
        )
    }

    pub fn build_get<R: Resource>(&self, id: u64) -> HttpRequest {
        self.request(
            format!("{}/{id}", self.collection_url::<R>()),
            CacheOptions::for_item(R::TAG, ItemKey::Id(id)),
        )
    }

    /// A list request filtered on `slug`. Only the slug is sent so the server
    /// applies no other filter to the lookup.
    pub fn build_get_by_slug<R: Resource>(&self, slug: &str) -> HttpRequest {
        let mut params = std::collections::BTreeMap::new();
        params.insert("slug", slug.to_string());
        self.request(
            format!("{}?{}", self.collection_url::<R>(), encode(&params)),
            CacheOptions::for_item(R::TAG, ItemKey::Slug(slug)),
        )
    }

    /// Items in the order the server returned them.
    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    pub fn parse_get<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        decode(&response)
    }

    /// First item of the slug lookup. An empty result is `NotFound`; when the
    /// server returns several matches the first one wins.
    pub fn parse_get_by_slug<R: Resource>(
        &self,
        slug: &str,
        response: HttpResponse,
    ) -> Result<R, ApiError> {
        let url = response.url.clone();
        self.parse_list::<R>(response)?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound {
                resource: R::NAME,
                slug: slug.to_string(),
                url,
            })
    }

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}{API_PREFIX}/{}", self.config.base_url(), R::PATH)
    }

    fn request(&self, url: String, cache: CacheOptions) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("user-agent".to_string(), USER_AGENT.to_string()),
            ],
            cache,
        }
    }
}

/// Map any non-2xx status to `ApiError::Http`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        message: response.reason.clone(),
        url: response.url.clone(),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
        url: response.url.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{PluginFilter, Taxonomy};
    use crate::types::{Media, Plugin, Post, PluginCategory};

    const BASE: &str = "http://localhost:8080";

    fn client() -> WordPressClient {
        WordPressClient::new(BASE).unwrap()
    }

    fn response(url: &str, status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            url: url.to_string(),
            status,
            reason: if status == 200 { "OK" } else { "Not Found" }.to_string(),
            body: body.to_string(),
        }
    }

    fn plugin_json(id: u64, slug: &str) -> String {
        format!(
            r#"{{"id":{id},"slug":"{slug}","date":"2024-01-01T00:00:00","modified":"2024-01-02T00:00:00","status":"publish","title":{{"rendered":"{slug}"}}}}"#
        )
    }

    #[test]
    fn blank_base_url_is_refused() {
        assert_eq!(WordPressClient::new("").unwrap_err(), ConfigError::MissingBaseUrl);
    }

    #[test]
    fn build_list_applies_default_page_size_and_tags() {
        let req = client().build_list::<Post>(&ListQuery::new());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/wp-json/wp/v2/posts?per_page=100");
        assert_eq!(req.cache.tags, vec!["wordpress", "posts"]);
        assert_eq!(req.cache.revalidate, 3600);
        assert!(req
            .headers
            .contains(&("accept".to_string(), "application/json".to_string())));
    }

    #[test]
    fn build_list_for_plugins_uses_custom_post_type_path() {
        let filter = PluginFilter {
            category: Some(3),
            ..PluginFilter::default()
        };
        let req = client().build_list::<Plugin>(&ListQuery::from(&filter));
        assert_eq!(
            req.url,
            "http://localhost:8080/wp-json/wp/v2/fv_plugin?_embed=true&fv_category=3&per_page=100"
        );
        assert!(req.cache.has_tag("plugins"));
    }

    #[test]
    fn build_get_tags_the_specific_id() {
        let req = client().build_get::<Media>(42);
        assert_eq!(req.url, "http://localhost:8080/wp-json/wp/v2/media/42");
        assert_eq!(req.cache.tags, vec!["wordpress", "media", "media:42"]);
    }

    #[test]
    fn build_get_by_slug_sends_only_the_slug() {
        let req = client().build_get_by_slug::<PluginCategory>("page builders");
        assert_eq!(
            req.url,
            "http://localhost:8080/wp-json/wp/v2/fv_category?slug=page%20builders"
        );
        assert!(req.cache.has_tag("plugin-categories:slug:page builders"));
    }

    #[test]
    fn list_query_terms_reach_the_url() {
        let query = ListQuery::new().search("cache").term(Taxonomy::Categories, 4);
        let req = client().build_list::<Post>(&query);
        assert!(req.url.contains("search=cache"));
        assert!(req.url.contains("categories=4"));
    }

    #[test]
    fn parse_list_preserves_server_order() {
        let body = format!("[{},{},{}]", plugin_json(3, "c"), plugin_json(1, "a"), plugin_json(2, "b"));
        let plugins = client()
            .parse_list::<Plugin>(response("u", 200, &body))
            .unwrap();
        let ids: Vec<u64> = plugins.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn parse_get_carries_status_and_url_on_failure() {
        let url = "http://localhost:8080/wp-json/wp/v2/fv_plugin/999";
        let err = client()
            .parse_get::<Plugin>(response(url, 404, r#"{"code":"rest_post_invalid_id"}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                message: "Not Found".to_string(),
                url: url.to_string(),
            }
        );
    }

    #[test]
    fn parse_get_by_slug_empty_list_is_not_found() {
        let url = "http://localhost:8080/wp-json/wp/v2/fv_plugin?slug=ghost";
        let err = client()
            .parse_get_by_slug::<Plugin>("ghost", response(url, 200, "[]"))
            .unwrap_err();
        match err {
            ApiError::NotFound { resource, slug, url: failed } => {
                assert_eq!(resource, "plugin");
                assert_eq!(slug, "ghost");
                assert_eq!(failed, url);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn parse_get_by_slug_takes_first_of_many() {
        let body = format!("[{},{}]", plugin_json(8, "dup"), plugin_json(4, "dup"));
        let plugin = client()
            .parse_get_by_slug::<Plugin>("dup", response("u", 200, &body))
            .unwrap();
        assert_eq!(plugin.id, 8);
    }

    #[test]
    fn parse_list_bad_json_is_decode_error() {
        let err = client()
            .parse_list::<Post>(response("u", 200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
