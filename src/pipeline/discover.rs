//! Link discovery over the category listing page.
//!
//! Walks the category group containers, pulls each list item's anchor,
//! filters out taxonomy pages, and keeps only names the store has not
//! seen. Skipping already-ingested names here is what makes re-runs
//! idempotent.

use percent_encoding::percent_decode_str;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::traits::{fetcher::PageFetcher, store::EntityStore};
use crate::types::entity::EntityLink;

const GROUP_SELECTOR: &str = "div.mw-category > div.mw-category-group";
const ITEM_SELECTOR: &str = "ul > li";
const ANCHOR_SELECTOR: &str = "a";

/// Anchors whose href contains this marker are taxonomy pages, not
/// entities.
const TAXONOMY_MARKER: &str = "Category";

/// Discover entities on the category listing page that are not yet in
/// the store.
///
/// Fails as a whole if the listing page cannot be fetched; there is no
/// partial link list to fall back on.
pub async fn discover_links<F, S>(
    config: &SiteConfig,
    fetcher: &F,
    store: &S,
) -> Result<Vec<EntityLink>>
where
    F: PageFetcher,
    S: EntityStore,
{
    info!(url = %config.category_url(), "Discovering entity links");
    let markup = fetcher.fetch(&config.category_url()).await?;

    // Parsing happens before any store call so the parsed document
    // never lives across an await.
    let candidates = parse_category_links(&markup, config);

    let mut links = Vec::new();
    for (name, href) in candidates {
        if store.find_entity_by_name(&name).await?.is_some() {
            debug!(entity = %name, "Already ingested, skipping");
            continue;
        }
        info!(entity = %name, "Found new entity");
        links.push(EntityLink::new(name, config.absolute_url(&href)));
    }

    info!(count = links.len(), "Discovery complete");
    Ok(links)
}

/// Parse the listing markup into `(name, href)` candidates, in document
/// order.
fn parse_category_links(markup: &str, config: &SiteConfig) -> Vec<(String, String)> {
    let document = Html::parse_document(markup);
    let groups = Selector::parse(GROUP_SELECTOR).expect("static selector");
    let items = Selector::parse(ITEM_SELECTOR).expect("static selector");
    let anchors = Selector::parse(ANCHOR_SELECTOR).expect("static selector");

    let mut candidates = Vec::new();
    for group in document.select(&groups) {
        for item in group.select(&items) {
            let Some(anchor) = item.select(&anchors).next() else {
                continue;
            };
            let href = anchor.value().attr("href").unwrap_or_default();
            if href.is_empty() || href.contains(TAXONOMY_MARKER) {
                continue;
            }
            candidates.push((derive_name(href, &config.wiki_prefix), href.to_string()));
        }
    }
    candidates
}

/// Derive the display name from an entity href: drop the wiki path
/// prefix, underscores become spaces, trim, percent-decode.
fn derive_name(href: &str, wiki_prefix: &str) -> String {
    let path = href
        .split_once(wiki_prefix)
        .map(|(_, rest)| rest)
        .unwrap_or(href);
    let spaced = path.replace('_', " ");
    percent_decode_str(spaced.trim())
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::MockFetcher;
    use crate::stores::MemoryStore;
    use crate::traits::store::EntityStore as _;
    use crate::types::entity::NewEntity;

    const LISTING: &str = r#"
        <div class="mw-category">
          <div class="mw-category-group">
            <h3>K</h3>
            <ul>
              <li><a href="/wiki/Kaladin_Stormblessed">Kaladin</a></li>
              <li><a href="/wiki/Category:Windrunners">Windrunners</a></li>
            </ul>
          </div>
          <div class="mw-category-group">
            <h3>S</h3>
            <ul>
              <li><a href="/wiki/Sylphrena">Sylphrena</a></li>
              <li><a href="/wiki/Nale%27Elin">Nale</a></li>
            </ul>
          </div>
        </div>
    "#;

    #[test]
    fn test_parse_filters_taxonomy_and_derives_names() {
        let config = SiteConfig::default();
        let candidates = parse_category_links(LISTING, &config);
        let names: Vec<_> = candidates.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Kaladin Stormblessed", "Sylphrena", "Nale'Elin"]);
        assert_eq!(candidates[0].1, "/wiki/Kaladin_Stormblessed");
    }

    #[test]
    fn test_derive_name() {
        assert_eq!(
            derive_name("/wiki/Kaladin_Stormblessed", "/wiki/"),
            "Kaladin Stormblessed"
        );
        assert_eq!(derive_name("/wiki/Nale%27Elin", "/wiki/"), "Nale'Elin");
    }

    #[test]
    fn test_parse_empty_listing() {
        let config = SiteConfig::default();
        assert!(parse_category_links("<html><body></body></html>", &config).is_empty());
    }

    #[tokio::test]
    async fn test_discover_skips_known_entities() {
        let config = SiteConfig::new("https://x", "/wiki/Category:People");
        let fetcher = MockFetcher::new().with_page(config.category_url(), LISTING);
        let store = MemoryStore::new();
        store
            .create_entity(NewEntity::new("Sylphrena"))
            .await
            .unwrap();

        let links = discover_links(&config, &fetcher, &store).await.unwrap();
        let names: Vec<_> = links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Kaladin Stormblessed", "Nale'Elin"]);
        assert_eq!(links[0].url, "https://x/wiki/Kaladin_Stormblessed");
    }

    #[tokio::test]
    async fn test_discover_fails_when_listing_unreachable() {
        let config = SiteConfig::new("https://x", "/wiki/Category:People");
        let fetcher = MockFetcher::new();
        let store = MemoryStore::new();
        assert!(discover_links(&config, &fetcher, &store).await.is_err());
    }
}
