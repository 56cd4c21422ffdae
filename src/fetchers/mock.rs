//! Mock fetcher for testing.
//!
//! Serves canned markup by URL and records every fetch for
//! verification. URLs without a canned page answer 404 so tests can
//! exercise per-entity failure paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::PageFetcher;

/// Canned-response fetcher.
///
/// # Example
///
/// ```rust
/// use wikibio::fetchers::MockFetcher;
///
/// let fetcher = MockFetcher::new()
///     .with_page("https://example.org/wiki/A", "<html></html>");
/// ```
#[derive(Default)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    fetch_calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned page.
    pub fn add_page(&self, url: impl Into<String>, markup: impl Into<String>) {
        self.pages.write().unwrap().insert(url.into(), markup.into());
    }

    /// Add a canned page (builder form).
    pub fn with_page(self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.add_page(url, markup);
        self
    }

    /// URLs fetched so far, in order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.read().unwrap().clone()
    }

    /// Number of fetches so far.
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_calls.read().unwrap().len()
    }

    /// Forget recorded calls.
    pub fn reset_calls(&self) {
        self.fetch_calls.write().unwrap().clear();
    }
}

impl Clone for MockFetcher {
    fn clone(&self) -> Self {
        Self {
            pages: Arc::clone(&self.pages),
            fetch_calls: Arc::clone(&self.fetch_calls),
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.fetch_calls.write().unwrap().push(url.to_string());

        match self.pages.read().unwrap().get(url) {
            Some(markup) => Ok(markup.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_page_and_call_recording() {
        let fetcher = MockFetcher::new().with_page("https://x/wiki/A", "<p>a</p>");

        assert_eq!(fetcher.fetch("https://x/wiki/A").await.unwrap(), "<p>a</p>");
        assert!(fetcher.fetch("https://x/wiki/B").await.is_err());
        assert_eq!(
            fetcher.fetch_calls(),
            vec!["https://x/wiki/A".to_string(), "https://x/wiki/B".to_string()]
        );
    }
}
