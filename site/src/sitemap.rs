//! Sitemap of every published post, page and plugin.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use wp_core::{ApiError, Page, Plugin, Post};

use crate::config::SiteConfig;
use crate::source::ContentSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Fetch posts, pages and plugins concurrently and build the sitemap.
pub async fn sitemap(source: &ContentSource, site: &SiteConfig) -> Result<Vec<SitemapEntry>, ApiError> {
    let (posts, pages, plugins) = tokio::try_join!(
        source.all::<Post>(),
        source.all::<Page>(),
        source.all::<Plugin>(),
    )?;
    Ok(build_entries(site, &posts, &pages, &plugins, Utc::now()))
}

/// Section roots stamped with `now`, then one entry per item stamped with
/// its own modification time. Items carry local server time in `modified`,
/// so `modified_gmt` is used whenever the server sends it.
pub fn build_entries(
    site: &SiteConfig,
    posts: &[Post],
    pages: &[Page],
    plugins: &[Plugin],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let origin = site.origin();
    let entry = |path: String,
                 last_modified: DateTime<Utc>,
                 change_frequency: ChangeFrequency,
                 priority: f32| SitemapEntry {
        url: format!("{origin}{path}"),
        last_modified,
        change_frequency,
        priority,
    };

    let mut entries = vec![
        entry(String::new(), now, ChangeFrequency::Daily, 1.0),
        entry("/posts".to_string(), now, ChangeFrequency::Daily, 0.8),
        entry("/plugins".to_string(), now, ChangeFrequency::Daily, 0.8),
    ];
    entries.extend(
        posts
            .iter()
            .map(|p| entry(format!("/posts/{}", p.slug), utc(p.modified_gmt, p.modified), ChangeFrequency::Weekly, 0.7)),
    );
    entries.extend(
        pages
            .iter()
            .map(|p| entry(format!("/pages/{}", p.slug), utc(p.modified_gmt, p.modified), ChangeFrequency::Monthly, 0.6)),
    );
    entries.extend(
        plugins
            .iter()
            .map(|p| entry(format!("/plugins/{}", p.slug), utc(p.modified_gmt, p.modified), ChangeFrequency::Weekly, 0.7)),
    );
    entries
}

fn utc(modified_gmt: Option<NaiveDateTime>, modified: NaiveDateTime) -> DateTime<Utc> {
    modified_gmt.unwrap_or(modified).and_utc()
}

pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "<url>\n<loc>{}</loc>\n<lastmod>{}</lastmod>\n<changefreq>{}</changefreq>\n<priority>{:.1}</priority>\n</url>\n",
            escape(&entry.url),
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.change_frequency.as_str(),
            entry.priority,
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
