//! Core trait abstractions for the ingestion library.
//!
//! These traits define the seams the pipeline is written against:
//! fetching page markup and persisting/looking up records.

pub mod fetcher;
pub mod store;

pub use fetcher::PageFetcher;
pub use store::EntityStore;
