//! List filters and query-string encoding.
//!
//! # Design
//! `ListQuery` is a transient value built per request. Parameters are
//! collected into a `BTreeMap` so the encoded query string is sorted by key
//! and stable for a given query, which keeps request URLs (and therefore
//! cache keys) deterministic.

use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Page size applied when the caller does not override it.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Unreserved characters per RFC 3986 stay literal; everything else is
/// percent-encoded, including `,` and space.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Taxonomies a list request can filter on, with their query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Taxonomy {
    Categories,
    Tags,
    AccessLevel,
    PluginCategory,
    OriginalAuthor,
    PluginTag,
}

impl Taxonomy {
    pub fn param(self) -> &'static str {
        match self {
            Taxonomy::Categories => "categories",
            Taxonomy::Tags => "tags",
            Taxonomy::AccessLevel => "fv_access_level",
            Taxonomy::PluginCategory => "fv_category",
            Taxonomy::OriginalAuthor => "original_author_tax",
            Taxonomy::PluginTag => "fv_tag",
        }
    }
}

/// Filters and pagination for a list request.
///
/// `per_page` of `None` means the default of 100 is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub slug: Option<String>,
    pub author: Option<u64>,
    pub terms: BTreeMap<Taxonomy, Vec<u64>>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub post: Option<u64>,
    pub embed: bool,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text search, as used by the category, tag and author pickers.
    pub fn search_terms(query: &str) -> Self {
        Self::new().search(query)
    }

    /// Terms attached to one post.
    pub fn for_post(post_id: u64) -> Self {
        Self {
            post: Some(post_id),
            ..Self::default()
        }
    }

    pub fn search(mut self, query: &str) -> Self {
        self.search = Some(query.to_string());
        self
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn author(mut self, author_id: u64) -> Self {
        self.author = Some(author_id);
        self
    }

    /// Restrict to items carrying `term_id`. Repeated calls for the same
    /// taxonomy accumulate.
    pub fn term(mut self, taxonomy: Taxonomy, term_id: u64) -> Self {
        self.terms.entry(taxonomy).or_default().push(term_id);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn embed(mut self) -> Self {
        self.embed = true;
        self
    }

    /// Key/value pairs in sorted key order.
    pub fn params(&self) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        if self.embed {
            params.insert("_embed", "true".to_string());
        }
        params.insert(
            "per_page",
            self.per_page.unwrap_or(DEFAULT_PER_PAGE).to_string(),
        );
        if let Some(page) = self.page {
            params.insert("page", page.to_string());
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.insert("search", search.to_string());
        }
        if let Some(slug) = &self.slug {
            params.insert("slug", slug.clone());
        }
        if let Some(author) = self.author {
            params.insert("author", author.to_string());
        }
        if let Some(post) = self.post {
            params.insert("post", post.to_string());
        }
        for (taxonomy, ids) in &self.terms {
            if ids.is_empty() {
                continue;
            }
            let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            params.insert(taxonomy.param(), joined);
        }
        params
    }

    /// Encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        encode(&self.params())
    }
}

/// Percent-encode `params` as `k=v&k=v`.
pub fn encode(params: &BTreeMap<&'static str, String>) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, QUERY_VALUE)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Filters accepted by the post listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub search: Option<String>,
    pub author: Option<u64>,
    pub category: Option<u64>,
    pub tag: Option<u64>,
}

impl From<&PostFilter> for ListQuery {
    fn from(filter: &PostFilter) -> Self {
        let mut query = ListQuery::new().embed();
        query.search = filter.search.clone();
        query.author = filter.author;
        if let Some(category) = filter.category {
            query = query.term(Taxonomy::Categories, category);
        }
        if let Some(tag) = filter.tag {
            query = query.term(Taxonomy::Tags, tag);
        }
        query
    }
}

/// Filters accepted by the plugin catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginFilter {
    pub search: Option<String>,
    pub access_level: Option<u64>,
    pub category: Option<u64>,
    pub original_author: Option<u64>,
    pub tag: Option<u64>,
}

impl From<&PluginFilter> for ListQuery {
    fn from(filter: &PluginFilter) -> Self {
        let mut query = ListQuery::new().embed();
        query.search = filter.search.clone();
        let pairs = [
            (Taxonomy::AccessLevel, filter.access_level),
            (Taxonomy::PluginCategory, filter.category),
            (Taxonomy::OriginalAuthor, filter.original_author),
            (Taxonomy::PluginTag, filter.tag),
        ];
        for (taxonomy, id) in pairs {
            if let Some(id) = id {
                query = query.term(taxonomy, id);
            }
        }
        query
    }
}
