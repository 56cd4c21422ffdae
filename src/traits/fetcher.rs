//! Page fetcher trait.
//!
//! A fetcher retrieves one page's raw markup by absolute URL. No
//! caching, no retries; callers decide what a failure means for them.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Retrieves raw page markup over some transport.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw markup at `url`.
    ///
    /// Non-success responses are errors, not empty documents.
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}
