//! Wiki Biography Extraction & Ingestion Library
//!
//! Scrapes a semi-structured public wiki: discovers entity links on a
//! category listing page, parses each entity's infobox into a typed
//! biographical record, resolves the portrait image with its responsive
//! variants, and commits each entity exactly once.
//!
//! # Design Philosophy
//!
//! - Tolerant parsing: missing rows and missing infoboxes degrade to
//!   absent fields, never to errors
//! - Idempotent re-runs: discovery skips names the store already holds
//! - Per-entity failure isolation: one bad page never aborts a run
//! - Explicit seams: fetching and persistence are traits the caller
//!   provides; nothing is ambient
//!
//! # Usage
//!
//! ```rust,ignore
//! use wikibio::{run, HttpFetcher, SiteConfig, SqliteStore};
//!
//! let config = SiteConfig::default();
//! let fetcher = HttpFetcher::new();
//! let store = SqliteStore::new("sqlite://./wikibio.db?mode=rwc").await?;
//!
//! let report = run(&config, &fetcher, &store).await?;
//! println!("committed {} of {}", report.committed, report.discovered);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (PageFetcher, EntityStore)
//! - [`types`] - Domain types (entities, images, store queries)
//! - [`pipeline`] - Discovery, extraction, image resolution, ingestion
//! - [`fetchers`] - Fetcher implementations (HttpFetcher, MockFetcher)
//! - [`stores`] - Storage implementations (MemoryStore, SqliteStore)

pub mod config;
pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod stores;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::SiteConfig;
pub use error::{FetchError, IngestError, StoreError};
pub use traits::{fetcher::PageFetcher, store::EntityStore};
pub use types::{
    entity::{AttributeKind, EntityFields, EntityLink, EntityRecord, NewEntity},
    image::{ImageRecord, ImageVariant, NewImage, RawImage},
    query::{EntityColumn, EntityFilter, EntityQuery, SortOrder},
};

// Re-export the pipeline surface
pub use pipeline::{
    discover::discover_links,
    extract::{extract_record, ExtractedRecord},
    image::resolve_image,
    ingest::{run, FailedEntity, IngestReport},
};

// Re-export implementations
pub use fetchers::{HttpFetcher, MockFetcher};
pub use stores::MemoryStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;
