//! Domain types for biographical entities, images, and store queries.

pub mod entity;
pub mod image;
pub mod query;

pub use entity::{AttributeKind, EntityFields, EntityLink, EntityRecord, NewEntity};
pub use image::{ImageRecord, ImageVariant, NewImage, RawImage};
pub use query::{EntityColumn, EntityFilter, EntityQuery, SortOrder};
