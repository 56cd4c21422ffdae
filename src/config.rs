//! Site configuration for an ingestion run.

use serde::{Deserialize, Serialize};

/// Where to scrape and how entity paths look on that site.
///
/// Passed explicitly into every pipeline call; there is no ambient
/// global configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site base URL without a trailing slash, e.g. `https://coppermind.net`.
    pub base_url: String,

    /// Path of the category listing page, e.g. `/wiki/Category:Rosharans`.
    pub category_path: String,

    /// Path prefix that entity hrefs carry before the page name.
    pub wiki_prefix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://coppermind.net".to_string(),
            category_path: "/wiki/Category:Rosharans".to_string(),
            wiki_prefix: "/wiki/".to_string(),
        }
    }
}

impl SiteConfig {
    /// Create a config for a site and category listing.
    pub fn new(base_url: impl Into<String>, category_path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            category_path: category_path.into(),
            ..Self::default()
        }
    }

    /// Set the entity path prefix.
    pub fn with_wiki_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.wiki_prefix = prefix.into();
        self
    }

    /// Absolute URL of the category listing page.
    pub fn category_url(&self) -> String {
        format!("{}{}", self.base_url, self.category_path)
    }

    /// Absolutize a site-relative href.
    pub fn absolute_url(&self, href: &str) -> String {
        format!("{}{}", self.base_url, href)
    }
}
