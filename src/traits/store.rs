//! Entity store trait.
//!
//! The persistence collaborator behind the pipeline. The write side
//! (`create_*`) and the existence check (`find_entity_by_name`) are what
//! the core uses; the read side (`find_entities`, `count_entities`,
//! `find_entity_by_id`, image lookups) is the surface a retrieval layer
//! consumes.
//!
//! Creation order matters to callers: an image is persisted before the
//! entity that references it, so an image without an owning entity can
//! exist after a failed commit. That orphan is accepted, not an error.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{
    entity::{EntityRecord, NewEntity},
    image::{ImageRecord, ImageVariant, NewImage},
    query::{EntityFilter, EntityQuery},
};

/// Persistence boundary for entities, images, and image variants.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Look up an entity by its exact name.
    ///
    /// This is the dedup check that makes re-runs idempotent.
    async fn find_entity_by_name(&self, name: &str) -> StoreResult<Option<EntityRecord>>;

    /// Look up an entity by identifier.
    async fn find_entity_by_id(&self, id: i64) -> StoreResult<Option<EntityRecord>>;

    /// List entities with pagination, sort, cursor, and filter.
    async fn find_entities(&self, query: &EntityQuery) -> StoreResult<Vec<EntityRecord>>;

    /// Count entities, optionally restricted by an equality filter.
    async fn count_entities(&self, filter: Option<&EntityFilter>) -> StoreResult<u64>;

    /// Create an entity. Fails with `StoreError::DuplicateName` if the
    /// name is already taken.
    async fn create_entity(&self, entity: NewEntity) -> StoreResult<EntityRecord>;

    /// Create an image, returning it with its generated identifier.
    async fn create_image(&self, image: NewImage) -> StoreResult<ImageRecord>;

    /// Create all variants of one image in a single batch, preserving
    /// the given order.
    async fn create_image_variants(&self, image_id: i64, urls: &[String]) -> StoreResult<()>;

    /// Look up an image by identifier.
    async fn find_image(&self, id: i64) -> StoreResult<Option<ImageRecord>>;

    /// Variants of an image, in insertion order.
    async fn image_variants(&self, image_id: i64) -> StoreResult<Vec<ImageVariant>>;
}
