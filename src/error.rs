//! Typed errors for the ingestion library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while fetching page markup.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed at the transport level
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Server answered with a non-success status
    #[error("HTTP status {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur in a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend operation failed
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Unique-name constraint violated on entity creation
    #[error("entity already exists: {name}")]
    DuplicateName { name: String },
}

impl StoreError {
    /// Wrap an arbitrary backend error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}

/// Errors that can abort an ingestion run or a single entity within it.
///
/// Parse problems never appear here: absent markup degrades to absent
/// fields rather than an error.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Page fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Store operation failed
    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
