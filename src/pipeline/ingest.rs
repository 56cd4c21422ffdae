//! Ingestion orchestrator: discover, then per entity fetch → extract →
//! resolve image → commit.
//!
//! Entities are processed strictly sequentially, in discovery order.
//! One bad page aborts only its own entity; the run carries on and
//! reports every failure at the end. Nothing is retried within a run —
//! re-running later skips whatever already committed.

use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::pipeline::discover::discover_links;
use crate::pipeline::extract::extract_record;
use crate::pipeline::image::resolve_image;
use crate::traits::{fetcher::PageFetcher, store::EntityStore};
use crate::types::entity::{EntityLink, EntityRecord, NewEntity};

/// One entity the run could not commit.
#[derive(Debug, Clone)]
pub struct FailedEntity {
    pub name: String,
    pub url: String,
    pub reason: String,
}

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Links returned by discovery.
    pub discovered: usize,

    /// Entities committed to the store.
    pub committed: usize,

    /// Entities attempted but not committed.
    pub failed: Vec<FailedEntity>,
}

impl IngestReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every discovered entity committed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run the pipeline end to end.
///
/// Discovery failure fails the run; everything after that is isolated
/// per entity. Zero discovered links is a normal, successful outcome.
pub async fn run<F, S>(config: &SiteConfig, fetcher: &F, store: &S) -> Result<IngestReport>
where
    F: PageFetcher,
    S: EntityStore,
{
    info!(site = %config.base_url, "Starting ingestion run");
    let mut report = IngestReport::new();

    let links = discover_links(config, fetcher, store).await?;
    report.discovered = links.len();

    if links.is_empty() {
        info!("No new entities found");
        return Ok(report);
    }
    info!(count = links.len(), "Ingesting new entities");

    for link in &links {
        match ingest_entity(link, config, fetcher, store).await {
            Ok(entity) => {
                info!(entity = %entity.name, id = entity.id, "Created entity");
                report.committed += 1;
            }
            Err(e) => {
                warn!(entity = %link.name, url = %link.url, error = %e, "Entity failed, skipping");
                report.failed.push(FailedEntity {
                    name: link.name.clone(),
                    url: link.url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        discovered = report.discovered,
        committed = report.committed,
        failed = report.failed.len(),
        "Ingestion run complete"
    );
    Ok(report)
}

/// Fetch, extract, resolve, and commit one entity.
///
/// The image is persisted before the entity; a commit failure after
/// that leaves the image behind as an accepted orphan.
async fn ingest_entity<F, S>(
    link: &EntityLink,
    config: &SiteConfig,
    fetcher: &F,
    store: &S,
) -> Result<EntityRecord>
where
    F: PageFetcher,
    S: EntityStore,
{
    let markup = fetcher.fetch(&link.url).await?;
    let extracted = extract_record(&markup);

    let image_id = resolve_image(extracted.image.as_ref(), config, store).await?;

    let mut entity = NewEntity::new(&link.name).with_fields(extracted.fields);
    entity.image_id = image_id;

    Ok(store.create_entity(entity).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::MockFetcher;
    use crate::stores::MemoryStore;
    use crate::traits::store::EntityStore as _;

    fn listing(items: &[&str]) -> String {
        let lis: String = items
            .iter()
            .map(|href| format!(r#"<li><a href="{href}">x</a></li>"#))
            .collect();
        format!(
            r#"<div class="mw-category"><div class="mw-category-group"><ul>{lis}</ul></div></div>"#
        )
    }

    fn detail(rows: &str) -> String {
        format!(r#"<table class="infobox" id="Character"><tbody>{rows}</tbody></table>"#)
    }

    fn config() -> SiteConfig {
        SiteConfig::new("https://x", "/wiki/Category:People")
    }

    #[tokio::test]
    async fn test_empty_discovery_is_a_normal_done() {
        let config = config();
        let fetcher = MockFetcher::new().with_page(config.category_url(), listing(&[]));
        let store = MemoryStore::new();

        let report = run(&config, &fetcher, &store).await.unwrap();
        assert_eq!(report.discovered, 0);
        assert_eq!(report.committed, 0);
        assert!(report.is_success());
        assert_eq!(store.entity_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_isolation() {
        let config = config();
        let fetcher = MockFetcher::new()
            .with_page(
                config.category_url(),
                listing(&["/wiki/First", "/wiki/Second", "/wiki/Third"]),
            )
            .with_page(
                "https://x/wiki/First",
                detail("<tr><th>Born</th><td>1173</td></tr>"),
            )
            // Second page intentionally missing: its fetch 404s.
            .with_page("https://x/wiki/Third", detail(""));
        let store = MemoryStore::new();

        let report = run(&config, &fetcher, &store).await.unwrap();
        assert_eq!(report.discovered, 3);
        assert_eq!(report.committed, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "Second");

        assert!(store.find_entity_by_name("First").await.unwrap().is_some());
        assert!(store.find_entity_by_name("Second").await.unwrap().is_none());
        assert!(store.find_entity_by_name("Third").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_entity_without_infobox_still_commits() {
        let config = config();
        let fetcher = MockFetcher::new()
            .with_page(config.category_url(), listing(&["/wiki/Bare"]))
            .with_page("https://x/wiki/Bare", "<html><body>nothing</body></html>");
        let store = MemoryStore::new();

        let report = run(&config, &fetcher, &store).await.unwrap();
        assert_eq!(report.committed, 1);

        let entity = store.find_entity_by_name("Bare").await.unwrap().unwrap();
        assert!(entity.fields.is_empty());
        assert!(entity.image_id.is_none());
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let config = config();
        let fetcher = MockFetcher::new()
            .with_page(config.category_url(), listing(&["/wiki/Only"]))
            .with_page(
                "https://x/wiki/Only",
                detail("<tr><th>Aliases</th><td>Someone</td></tr>"),
            );
        let store = MemoryStore::new();

        let first = run(&config, &fetcher, &store).await.unwrap();
        assert_eq!(first.committed, 1);

        let second = run(&config, &fetcher, &store).await.unwrap();
        assert_eq!(second.discovered, 0);
        assert_eq!(second.committed, 0);
        assert_eq!(store.entity_count(), 1);
    }

    #[tokio::test]
    async fn test_entity_gets_image_reference() {
        let config = config();
        let fetcher = MockFetcher::new()
            .with_page(config.category_url(), listing(&["/wiki/Pictured"]))
            .with_page(
                "https://x/wiki/Pictured",
                detail(
                    r#"<tr><td><a><img src="/img/p.png" srcset="/img/p.png 1x" width="10" height="20"></a></td></tr>"#,
                ),
            );
        let store = MemoryStore::new();

        run(&config, &fetcher, &store).await.unwrap();

        let entity = store.find_entity_by_name("Pictured").await.unwrap().unwrap();
        let image_id = entity.image_id.unwrap();
        let image = store.find_image(image_id).await.unwrap().unwrap();
        assert_eq!(image.primary_src, "https://x/img/p.png");
        assert_eq!(image.width, Some(10));
    }
}
