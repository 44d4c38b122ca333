//! Cache tags and revalidation.
//!
//! # Design
//! The core never stores responses. It labels every request with the tags a
//! host cache should index it under, plus a freshness window, and it decides
//! which tags a revalidation touches. Storage and expiry belong to whatever
//! implements `TagInvalidator`.

use std::fmt;

/// Tag attached to every request, regardless of resource.
pub const GLOBAL_TAG: &str = "wordpress";

/// Default freshness window for cached responses, in seconds.
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

/// Every content-type tag the client ever emits. A revalidation with no
/// explicit tags invalidates all of these.
pub const KNOWN_TAGS: &[&str] = &[
    GLOBAL_TAG,
    "posts",
    "pages",
    "categories",
    "tags",
    "authors",
    "media",
    "plugins",
    "plugin-access-levels",
    "plugin-categories",
    "plugin-original-authors",
    "plugin-tags",
];

/// Cache directives carried by each `HttpRequest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    pub tags: Vec<String>,
    pub revalidate: u64,
}

impl CacheOptions {
    /// Global tag plus the resource's coarse tag.
    pub fn for_collection(coarse: &str) -> Self {
        Self {
            tags: vec![GLOBAL_TAG.to_string(), coarse.to_string()],
            revalidate: DEFAULT_REVALIDATE_SECS,
        }
    }

    /// Collection tags plus one fine-grained tag for the requested item.
    pub fn for_item(coarse: &str, key: ItemKey<'_>) -> Self {
        let mut options = Self::for_collection(coarse);
        options.tags.push(item_tag(coarse, key));
        options
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// How a single item was addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKey<'a> {
    Id(u64),
    Slug(&'a str),
}

impl fmt::Display for ItemKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKey::Id(id) => write!(f, "{id}"),
            ItemKey::Slug(slug) => write!(f, "slug:{slug}"),
        }
    }
}

/// Fine-grained tag, e.g. `plugins:42` or `plugins:slug:seo-pack`.
pub fn item_tag(coarse: &str, key: ItemKey<'_>) -> String {
    format!("{coarse}:{key}")
}

/// A cache that can drop everything indexed under a tag.
pub trait TagInvalidator {
    fn invalidate_tag(&self, tag: &str);
}

/// Invalidate `tags`, or every entry of `KNOWN_TAGS` when `tags` is empty.
///
/// Returns the tags that were invalidated, in the order they were sent.
pub fn revalidate<I, S>(invalidator: &I, tags: &[S]) -> Vec<String>
where
    I: TagInvalidator + ?Sized,
    S: AsRef<str>,
{
    let targets: Vec<String> = if tags.is_empty() {
        KNOWN_TAGS.iter().map(|t| t.to_string()).collect()
    } else {
        tags.iter().map(|t| t.as_ref().to_string()).collect()
    };
    for tag in &targets {
        invalidator.invalidate_tag(tag);
    }
    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<String>>,
    }

    impl TagInvalidator for Recorder {
        fn invalidate_tag(&self, tag: &str) {
            self.seen.borrow_mut().push(tag.to_string());
        }
    }

    #[test]
    fn collection_options_carry_global_and_coarse_tags() {
        let options = CacheOptions::for_collection("plugins");
        assert_eq!(options.tags, vec!["wordpress", "plugins"]);
        assert_eq!(options.revalidate, 3600);
    }

    #[test]
    fn item_options_add_fine_grained_tag() {
        let by_id = CacheOptions::for_item("media", ItemKey::Id(7));
        assert!(by_id.has_tag("media:7"));
        let by_slug = CacheOptions::for_item("plugins", ItemKey::Slug("seo-pack"));
        assert!(by_slug.has_tag("plugins:slug:seo-pack"));
        assert!(by_slug.has_tag("plugins"));
    }

    #[test]
    fn revalidate_without_tags_hits_every_known_tag() {
        let recorder = Recorder::default();
        let done = revalidate::<_, &str>(&recorder, &[]);
        assert_eq!(done.len(), KNOWN_TAGS.len());
        for tag in KNOWN_TAGS {
            assert!(recorder.seen.borrow().iter().any(|t| t == tag), "{tag} not invalidated");
        }
    }

    #[test]
    fn revalidate_with_one_tag_touches_only_that_tag() {
        let recorder = Recorder::default();
        let done = revalidate(&recorder, &["plugins"]);
        assert_eq!(done, vec!["plugins"]);
        assert_eq!(*recorder.seen.borrow(), vec!["plugins".to_string()]);
    }

    #[test]
    fn every_resource_tag_is_known() {
        use crate::types::*;
        use crate::Resource;
        for tag in [
            Post::TAG,
            Page::TAG,
            Author::TAG,
            Media::TAG,
            Category::TAG,
            Tag::TAG,
            Plugin::TAG,
            AccessLevel::TAG,
            PluginCategory::TAG,
            OriginalAuthor::TAG,
            PluginTag::TAG,
        ] {
            assert!(KNOWN_TAGS.contains(&tag), "{tag} missing from KNOWN_TAGS");
        }
    }
}
