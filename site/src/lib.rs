//! Content layer of the headless WordPress site.
//!
//! # Overview
//! Executes `wp_core` requests over HTTP, keeps successful responses in a
//! tag-indexed cache, and loads the data each page renders.
//!
//! # Design
//! - `ContentSource` is the only way pages reach the content API. It is
//!   cheap to clone and shares one `TagCache` across clones.
//! - Page loaders fetch the primary entity, then fan out for secondary
//!   pieces and join before returning (`pages`).
//! - `Settings::from_env` refuses to start without `WORDPRESS_URL`.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod pages;
pub mod sitemap;
pub mod source;

pub use cache::TagCache;
pub use config::{MenuItem, Settings, SiteConfig, CONTENT_MENU, MAIN_MENU, PLUGIN_MENU};
pub use fetch::Fetcher;
pub use pages::{plugin_catalog, plugin_card, plugin_page, post_page, PageOutcome, PluginCard, PluginCatalog, PostPage};
pub use sitemap::{render_xml, sitemap, ChangeFrequency, SitemapEntry};
pub use source::ContentSource;
