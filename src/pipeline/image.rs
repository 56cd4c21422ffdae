//! Image resolution and persistence.
//!
//! Turns the raw `<img>` descriptor captured by extraction into one
//! persisted image plus its variant URLs. The image is persisted before
//! the entity that will reference it; if the entity commit later fails,
//! the image stays behind as an accepted orphan.

use tracing::debug;

use crate::config::SiteConfig;
use crate::error::StoreResult;
use crate::traits::store::EntityStore;
use crate::types::image::{NewImage, RawImage};

/// Resolve and persist the portrait image, returning its identifier.
///
/// `None` descriptor means the entity has no image. A descriptor
/// without `src` still produces an image with an empty `primary_src`;
/// a missing attribute never skips image creation.
///
/// The persisted variant set is every srcset entry absolutized against
/// the site base URL, with `primary_src` appended last so the canonical
/// rendition is always retrievable alongside the responsive ones.
pub async fn resolve_image<S>(
    raw: Option<&RawImage>,
    config: &SiteConfig,
    store: &S,
) -> StoreResult<Option<i64>>
where
    S: EntityStore,
{
    let Some(raw) = raw else {
        return Ok(None);
    };

    let primary_src = raw
        .src
        .as_deref()
        .map(|src| config.absolute_url(src))
        .unwrap_or_default();

    let image = store
        .create_image(NewImage {
            primary_src: primary_src.clone(),
            width: parse_dimension(raw.width.as_deref()),
            height: parse_dimension(raw.height.as_deref()),
        })
        .await?;

    let mut variants: Vec<String> = parse_srcset(raw.srcset.as_deref().unwrap_or_default())
        .into_iter()
        .map(|fragment| config.absolute_url(fragment))
        .collect();
    variants.push(primary_src);

    store.create_image_variants(image.id, &variants).await?;
    debug!(image_id = image.id, variants = variants.len(), "Image persisted");

    Ok(Some(image.id))
}

/// A dimension attribute counts only when it is a positive integer.
fn parse_dimension(attr: Option<&str>) -> Option<i64> {
    attr.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// URL fragments of a srcset attribute: comma-separated tokens, each
/// token's fragment being the text before its first whitespace.
fn parse_srcset(srcset: &str) -> Vec<&str> {
    srcset
        .split(',')
        .filter_map(|token| token.split_whitespace().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    fn raw(src: Option<&str>, srcset: Option<&str>) -> RawImage {
        RawImage {
            src: src.map(str::to_string),
            srcset: srcset.map(str::to_string),
            width: None,
            height: None,
        }
    }

    #[tokio::test]
    async fn test_no_descriptor_means_no_image() {
        let store = MemoryStore::new();
        let config = SiteConfig::default();
        let id = resolve_image(None, &config, &store).await.unwrap();
        assert!(id.is_none());
        assert_eq!(store.image_count(), 0);
    }

    #[tokio::test]
    async fn test_variant_set_contains_primary_src() {
        let store = MemoryStore::new();
        let config = SiteConfig::new("https://x", "/wiki/Category:People");
        let descriptor = raw(Some("/a.png"), Some("/a.png 1x, /b.png 2x"));

        let id = resolve_image(Some(&descriptor), &config, &store)
            .await
            .unwrap()
            .unwrap();

        let image = store.find_image(id).await.unwrap().unwrap();
        assert_eq!(image.primary_src, "https://x/a.png");

        let urls: Vec<_> = store
            .image_variants(id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.url)
            .collect();
        assert_eq!(
            urls,
            vec!["https://x/a.png", "https://x/b.png", "https://x/a.png"]
        );
    }

    #[tokio::test]
    async fn test_primary_appended_even_when_not_in_srcset() {
        let store = MemoryStore::new();
        let config = SiteConfig::new("https://x", "/c");
        let descriptor = raw(Some("/a.png"), Some("/b.png 2x"));

        let id = resolve_image(Some(&descriptor), &config, &store)
            .await
            .unwrap()
            .unwrap();
        let urls: Vec<_> = store
            .image_variants(id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.url)
            .collect();
        assert!(urls.contains(&"https://x/a.png".to_string()));
        assert_eq!(urls.last().unwrap(), "https://x/a.png");
    }

    #[tokio::test]
    async fn test_missing_src_gives_empty_primary() {
        let store = MemoryStore::new();
        let config = SiteConfig::default();
        let descriptor = raw(None, None);

        let id = resolve_image(Some(&descriptor), &config, &store)
            .await
            .unwrap()
            .unwrap();
        let image = store.find_image(id).await.unwrap().unwrap();
        assert_eq!(image.primary_src, "");

        // The canonical entry is still appended, even when empty.
        let urls = store.image_variants(id).await.unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].url, "");
    }

    #[tokio::test]
    async fn test_dimension_parsing() {
        let store = MemoryStore::new();
        let config = SiteConfig::new("https://x", "/c");
        let descriptor = RawImage {
            src: Some("/a.png".to_string()),
            srcset: None,
            width: Some("300".to_string()),
            height: Some("not-a-number".to_string()),
        };

        let id = resolve_image(Some(&descriptor), &config, &store)
            .await
            .unwrap()
            .unwrap();
        let image = store.find_image(id).await.unwrap().unwrap();
        assert_eq!(image.width, Some(300));
        assert_eq!(image.height, None);
    }

    #[test]
    fn test_parse_dimension_rejects_non_positive() {
        assert_eq!(parse_dimension(Some("0")), None);
        assert_eq!(parse_dimension(Some("-5")), None);
        assert_eq!(parse_dimension(Some(" 42 ")), Some(42));
        assert_eq!(parse_dimension(None), None);
    }

    #[test]
    fn test_parse_srcset() {
        assert_eq!(
            parse_srcset("/a.png 1x, /b.png 2x"),
            vec!["/a.png", "/b.png"]
        );
        assert_eq!(parse_srcset(""), Vec::<&str>::new());
        assert_eq!(parse_srcset("/only.png"), vec!["/only.png"]);
    }
}
