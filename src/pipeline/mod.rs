//! The extraction-and-ingestion pipeline.
//!
//! - [`discover`] - find entity links on the category listing page
//! - [`extract`] - parse one detail page's infobox into typed fields
//! - [`image`] - resolve and persist the portrait image with variants
//! - [`ingest`] - drive a full run with per-entity failure isolation

pub mod discover;
pub mod extract;
pub mod image;
pub mod ingest;

pub use discover::discover_links;
pub use extract::{extract_record, ExtractedRecord};
pub use image::resolve_image;
pub use ingest::{run, FailedEntity, IngestReport};
