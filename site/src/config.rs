//! Site settings and static navigation.

use serde::Serialize;
use wp_core::{ClientConfig, ConfigError};

/// Public identity of the site, used for absolute URLs in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfig {
    pub site_name: String,
    pub site_domain: String,
    pub site_description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_name: "next-wp".to_string(),
            site_domain: "localhost:3000".to_string(),
            site_description: "Starter template for Headless WordPress".to_string(),
        }
    }
}

impl SiteConfig {
    /// Absolute origin without a trailing slash. A bare domain gets `https://`.
    pub fn origin(&self) -> String {
        let domain = self.site_domain.trim_end_matches('/');
        if domain.starts_with("http://") || domain.starts_with("https://") {
            domain.to_string()
        } else {
            format!("https://{domain}")
        }
    }
}

/// Everything read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientConfig,
    pub site: SiteConfig,
}

impl Settings {
    /// Load `.env` if present, then read the process environment. Fails
    /// before any request can be built when `WORDPRESS_URL` is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client = ClientConfig::from_lookup(&lookup)?;
        let defaults = SiteConfig::default();
        let site = SiteConfig {
            site_name: lookup("SITE_NAME").unwrap_or(defaults.site_name),
            site_domain: lookup("SITE_DOMAIN").unwrap_or(defaults.site_domain),
            site_description: lookup("SITE_DESCRIPTION").unwrap_or(defaults.site_description),
        };
        Ok(Self { client, site })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub label: &'static str,
    pub href: &'static str,
}

pub const MAIN_MENU: &[MenuItem] = &[
    MenuItem { label: "home", href: "/" },
    MenuItem { label: "about", href: "https://github.com/9d8dev/next-wp" },
    MenuItem { label: "blog", href: "/posts" },
    MenuItem { label: "plugins", href: "/plugins" },
];

pub const CONTENT_MENU: &[MenuItem] = &[
    MenuItem { label: "categories", href: "/posts/categories" },
    MenuItem { label: "tags", href: "/posts/tags" },
    MenuItem { label: "authors", href: "/posts/authors" },
];

pub const PLUGIN_MENU: &[MenuItem] = &[
    MenuItem { label: "categories", href: "/plugins/categories" },
    MenuItem { label: "tags", href: "/plugins/tags" },
];
