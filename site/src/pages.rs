//! Data loaders for the site's pages.
//!
//! # Design
//! Each loader fetches its primary entity first; a missing primary becomes
//! `PageOutcome::NotFound`, any other failure propagates. The independent
//! secondary lookups then run concurrently and are joined before the loader
//! returns. Secondary failures are logged and degrade to `None`, so a broken
//! thumbnail never takes the page down.

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;
use wp_core::{
    AccessLevel, ApiError, Author, Category, ListQuery, Media, OriginalAuthor, Plugin,
    PluginCategory, PluginFilter, PluginTag, Post, Resource,
};

use crate::source::ContentSource;

/// Result of loading a page whose primary entity may not exist.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Found(T),
    NotFound,
}

impl<T> PageOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            PageOutcome::Found(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }
}

/// A plugin with the pieces its card shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginCard {
    pub plugin: Plugin,
    pub featured_media: Option<Media>,
    pub category: Option<PluginCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub post: Post,
    pub featured_media: Option<Media>,
    pub author: Option<Author>,
    pub category: Option<Category>,
}

/// The plugin listing with everything its filter controls offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginCatalog {
    pub cards: Vec<PluginCard>,
    pub access_levels: Vec<AccessLevel>,
    pub categories: Vec<PluginCategory>,
    pub original_authors: Vec<OriginalAuthor>,
    pub tags: Vec<PluginTag>,
}

/// Fetch `R` by id when one is set. WordPress uses 0 for "none".
async fn secondary<R: Resource>(source: &ContentSource, id: Option<u64>) -> Option<R> {
    let id = id.filter(|id| *id != 0)?;
    match source.get::<R>(id).await {
        Ok(entity) => Some(entity),
        Err(err) => {
            warn!(resource = R::NAME, id, error = %err, "secondary fetch failed, rendering without it");
            None
        }
    }
}

fn primary<T>(result: Result<T, ApiError>) -> Result<PageOutcome<T>, ApiError> {
    match result {
        Ok(entity) => Ok(PageOutcome::Found(entity)),
        Err(err) if err.is_not_found() => Ok(PageOutcome::NotFound),
        Err(err) => Err(err),
    }
}

/// Media and first category for `plugin`, fetched concurrently.
pub async fn plugin_card(source: &ContentSource, plugin: Plugin) -> PluginCard {
    let (featured_media, category) = tokio::join!(
        secondary::<Media>(source, Some(plugin.featured_media)),
        secondary::<PluginCategory>(source, plugin.fv_category.first().copied()),
    );
    PluginCard {
        plugin,
        featured_media,
        category,
    }
}

pub async fn plugin_page(
    source: &ContentSource,
    slug: &str,
) -> Result<PageOutcome<PluginCard>, ApiError> {
    let plugin = match primary(source.get_by_slug::<Plugin>(slug).await)? {
        PageOutcome::Found(plugin) => plugin,
        PageOutcome::NotFound => return Ok(PageOutcome::NotFound),
    };
    Ok(PageOutcome::Found(plugin_card(source, plugin).await))
}

pub async fn post_page(source: &ContentSource, slug: &str) -> Result<PageOutcome<PostPage>, ApiError> {
    let post = match primary(source.get_by_slug::<Post>(slug).await)? {
        PageOutcome::Found(post) => post,
        PageOutcome::NotFound => return Ok(PageOutcome::NotFound),
    };
    let (featured_media, author, category) = tokio::join!(
        secondary::<Media>(source, Some(post.featured_media)),
        secondary::<Author>(source, Some(post.author)),
        secondary::<Category>(source, post.categories.first().copied()),
    );
    Ok(PageOutcome::Found(PostPage {
        post,
        featured_media,
        author,
        category,
    }))
}

/// Plugins matching `filter` plus all four plugin taxonomies. Every listing
/// is required, so the first failure fails the page; card extras degrade.
pub async fn plugin_catalog(
    source: &ContentSource,
    filter: &PluginFilter,
) -> Result<PluginCatalog, ApiError> {
    let all = ListQuery::new();
    let (plugins, access_levels, categories, original_authors, tags) = tokio::try_join!(
        source.plugins(filter),
        source.list::<AccessLevel>(&all),
        source.list::<PluginCategory>(&all),
        source.list::<OriginalAuthor>(&all),
        source.list::<PluginTag>(&all),
    )?;
    let cards = join_all(plugins.into_iter().map(|plugin| plugin_card(source, plugin))).await;
    Ok(PluginCatalog {
        cards,
        access_levels,
        categories,
        original_authors,
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_maps_not_found_to_outcome() {
        let missing: Result<u8, ApiError> = Err(ApiError::NotFound {
            resource: "plugin",
            slug: "ghost".to_string(),
            url: "u".to_string(),
        });
        assert_eq!(primary(missing).unwrap(), PageOutcome::NotFound);

        let gone: Result<u8, ApiError> = Err(ApiError::Http {
            status: 404,
            message: "Not Found".to_string(),
            url: "u".to_string(),
        });
        assert_eq!(primary(gone).unwrap(), PageOutcome::NotFound);
    }

    #[test]
    fn primary_propagates_other_failures() {
        let broken: Result<u8, ApiError> = Err(ApiError::Http {
            status: 502,
            message: "Bad Gateway".to_string(),
            url: "u".to_string(),
        });
        assert!(matches!(primary(broken), Err(ApiError::Http { status: 502, .. })));
    }

    #[test]
    fn found_unwraps_outcome() {
        assert_eq!(PageOutcome::Found(3).found(), Some(3));
        assert_eq!(PageOutcome::<u8>::NotFound.found(), None);
    }
}
