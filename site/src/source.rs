//! Async content operations for page rendering.
//!
//! `ContentSource` pairs the stateless `WordPressClient` with a `Fetcher`
//! and exposes the list / get / get-by-slug shapes for every resource, plus
//! the lookups the site's pages need.

use std::sync::Arc;

use tracing::info;
use wp_core::{
    ApiError, Author, Category, ListQuery, Plugin, PluginFilter, Post, PostFilter, Resource, Tag,
    Taxonomy, WordPressClient,
};

use crate::cache::TagCache;
use crate::fetch::Fetcher;

#[derive(Clone)]
pub struct ContentSource {
    client: WordPressClient,
    fetcher: Fetcher,
    cache: Arc<TagCache>,
}

impl ContentSource {
    pub fn new(client: WordPressClient) -> Self {
        Self::with_cache(client, Arc::new(TagCache::new()))
    }

    pub fn with_cache(client: WordPressClient, cache: Arc<TagCache>) -> Self {
        Self {
            client,
            fetcher: Fetcher::new(cache.clone()),
            cache,
        }
    }

    pub fn client(&self) -> &WordPressClient {
        &self.client
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    pub async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Vec<R>, ApiError> {
        let request = self.client.build_list::<R>(query);
        let response = self.fetcher.execute(request).await?;
        self.client.parse_list(response)
    }

    pub async fn get<R: Resource>(&self, id: u64) -> Result<R, ApiError> {
        let request = self.client.build_get::<R>(id);
        let response = self.fetcher.execute(request).await?;
        self.client.parse_get(response)
    }

    pub async fn get_by_slug<R: Resource>(&self, slug: &str) -> Result<R, ApiError> {
        let request = self.client.build_get_by_slug::<R>(slug);
        let response = self.fetcher.execute(request).await?;
        self.client.parse_get_by_slug(slug, response)
    }

    /// First page of `R` at the default page size.
    pub async fn all<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.list(&ListQuery::new()).await
    }

    pub async fn posts(&self, filter: &PostFilter) -> Result<Vec<Post>, ApiError> {
        self.list(&ListQuery::from(filter)).await
    }

    pub async fn plugins(&self, filter: &PluginFilter) -> Result<Vec<Plugin>, ApiError> {
        self.list(&ListQuery::from(filter)).await
    }

    pub async fn posts_by_category_slug(&self, slug: &str) -> Result<Vec<Post>, ApiError> {
        let category = self.get_by_slug::<Category>(slug).await?;
        self.list(&ListQuery::new().term(Taxonomy::Categories, category.id))
            .await
    }

    pub async fn posts_by_tag_slug(&self, slug: &str) -> Result<Vec<Post>, ApiError> {
        let tag = self.get_by_slug::<Tag>(slug).await?;
        self.list(&ListQuery::new().term(Taxonomy::Tags, tag.id)).await
    }

    pub async fn posts_by_author_slug(&self, slug: &str) -> Result<Vec<Post>, ApiError> {
        let author = self.get_by_slug::<Author>(slug).await?;
        self.list(&ListQuery::new().author(author.id)).await
    }

    pub async fn tags_for_post(&self, post_id: u64) -> Result<Vec<Tag>, ApiError> {
        self.list(&ListQuery::for_post(post_id)).await
    }

    pub async fn search_categories(&self, query: &str) -> Result<Vec<Category>, ApiError> {
        self.list(&ListQuery::search_terms(query)).await
    }

    pub async fn search_tags(&self, query: &str) -> Result<Vec<Tag>, ApiError> {
        self.list(&ListQuery::search_terms(query)).await
    }

    pub async fn search_authors(&self, query: &str) -> Result<Vec<Author>, ApiError> {
        self.list(&ListQuery::search_terms(query)).await
    }

    /// Drop cached responses for `tags`, or for every content type when
    /// `tags` is empty.
    pub fn revalidate<S: AsRef<str>>(&self, tags: &[S]) -> Vec<String> {
        let done = wp_core::revalidate(self.cache.as_ref(), tags);
        info!(tags = ?done, "revalidated content cache");
        done
    }
}
