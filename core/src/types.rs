//! Records returned by the WordPress REST API.
//!
//! # Design
//! Each record mirrors the server's JSON and is not normalized beyond typing.
//! Fields the site never reads are left out; serde ignores them. All custom
//! taxonomies share the `Term` shape and differ only in where they live on
//! the server, which the `Resource` impls encode.

use std::collections::HashMap;
use std::ops::Deref;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A type the client can list and fetch.
pub trait Resource: serde::de::DeserializeOwned {
    /// Path segment under `/wp-json/wp/v2/`.
    const PATH: &'static str;
    /// Coarse cache tag shared by every request for this type.
    const TAG: &'static str;
    /// Singular name used in error messages.
    const NAME: &'static str;
}

/// Publication status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "publish")]
    Published,
    #[serde(rename = "future")]
    Scheduled,
    #[serde(rename = "draft")]
    Draft,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "private")]
    Private,
}

/// HTML fragment as rendered by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    pub rendered: String,
    #[serde(default)]
    pub protected: bool,
}

/// Metadata map. WordPress sends `[]` instead of `{}` when a record has no
/// registered meta, so both are accepted.
fn meta_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Array(items)) if items.is_empty() => Ok(Map::new()),
        None | Some(Value::Null) => Ok(Map::new()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected meta object, found {other}"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub date: NaiveDateTime,
    pub modified: NaiveDateTime,
    /// Modification time in UTC. Older servers omit it.
    #[serde(default)]
    pub modified_gmt: Option<NaiveDateTime>,
    pub status: Status,
    #[serde(default)]
    pub link: String,
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub author: u64,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(default)]
    pub sticky: bool,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default, deserialize_with = "meta_map")]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    pub slug: String,
    pub date: NaiveDateTime,
    pub modified: NaiveDateTime,
    /// Modification time in UTC. Older servers omit it.
    #[serde(default)]
    pub modified_gmt: Option<NaiveDateTime>,
    pub status: Status,
    #[serde(default)]
    pub link: String,
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub author: u64,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub menu_order: i64,
    #[serde(default, deserialize_with = "meta_map")]
    pub meta: Map<String, Value>,
}

/// A catalog entry of the `fv_plugin` custom post type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: u64,
    pub slug: String,
    pub date: NaiveDateTime,
    pub modified: NaiveDateTime,
    /// Modification time in UTC. Older servers omit it.
    #[serde(default)]
    pub modified_gmt: Option<NaiveDateTime>,
    pub status: Status,
    #[serde(default)]
    pub link: String,
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(default, deserialize_with = "meta_map")]
    pub meta: Map<String, Value>,
    #[serde(default)]
    pub fv_access_level: Vec<u64>,
    #[serde(default)]
    pub fv_category: Vec<u64>,
    #[serde(default)]
    pub original_author_tax: Vec<u64>,
    #[serde(default)]
    pub fv_tag: Vec<u64>,
}

impl Plugin {
    /// A string meta field, if present and non-empty.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn version(&self) -> Option<&str> {
        self.meta_str("version")
    }
}

/// Shared shape of categories, tags and the custom plugin taxonomies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub taxonomy: String,
    /// Absent on flat taxonomies such as tags; 0 means top level.
    #[serde(default)]
    pub parent: Option<u64>,
}

macro_rules! term_resource {
    ($(#[$doc:meta])* $name:ident, $path:literal, $tag:literal, $label:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Term);

        impl Deref for $name {
            type Target = Term;

            fn deref(&self) -> &Term {
                &self.0
            }
        }

        impl Resource for $name {
            const PATH: &'static str = $path;
            const TAG: &'static str = $tag;
            const NAME: &'static str = $label;
        }
    };
}

term_resource!(Category, "categories", "categories", "category");
term_resource!(Tag, "tags", "tags", "tag");
term_resource!(
    /// `fv_access_level` taxonomy term.
    AccessLevel,
    "fv_access_level",
    "plugin-access-levels",
    "access level"
);
term_resource!(
    /// `fv_category` taxonomy term.
    PluginCategory,
    "fv_category",
    "plugin-categories",
    "plugin category"
);
term_resource!(
    /// `original_author_tax` taxonomy term.
    OriginalAuthor,
    "original_author_tax",
    "plugin-original-authors",
    "original author"
);
term_resource!(
    /// `fv_tag` taxonomy term.
    PluginTag,
    "fv_tag",
    "plugin-tags",
    "plugin tag"
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub avatar_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSize {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub mime_type: String,
    pub source_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub sizes: HashMap<String, MediaSize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    pub source_url: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub media_details: MediaDetails,
}

impl Media {
    /// URL of the named size variant, falling back to the original file.
    pub fn size_url(&self, size: &str) -> &str {
        self.media_details
            .sizes
            .get(size)
            .map(|s| s.source_url.as_str())
            .unwrap_or(&self.source_url)
    }
}

impl Resource for Post {
    const PATH: &'static str = "posts";
    const TAG: &'static str = "posts";
    const NAME: &'static str = "post";
}

impl Resource for Page {
    const PATH: &'static str = "pages";
    const TAG: &'static str = "pages";
    const NAME: &'static str = "page";
}

impl Resource for Plugin {
    const PATH: &'static str = "fv_plugin";
    const TAG: &'static str = "plugins";
    const NAME: &'static str = "plugin";
}

impl Resource for Author {
    const PATH: &'static str = "users";
    const TAG: &'static str = "authors";
    const NAME: &'static str = "author";
}

impl Resource for Media {
    const PATH: &'static str = "media";
    const TAG: &'static str = "media";
    const NAME: &'static str = "media";
}
