//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::EntityStore;
use crate::types::{
    entity::{EntityRecord, NewEntity},
    image::{ImageRecord, ImageVariant, NewImage},
    query::{EntityColumn, EntityFilter, EntityQuery, SortOrder},
};

/// In-memory store for entities, images, and variants.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    entities: RwLock<Vec<EntityRecord>>,
    images: RwLock<Vec<ImageRecord>>,
    variants: RwLock<Vec<ImageVariant>>,
    next_entity_id: AtomicI64,
    next_image_id: AtomicI64,
    next_variant_id: AtomicI64,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.entities.write().unwrap().clear();
        self.images.write().unwrap().clear();
        self.variants.write().unwrap().clear();
    }

    /// Number of stored entities.
    pub fn entity_count(&self) -> usize {
        self.entities.read().unwrap().len()
    }

    /// Number of stored images.
    pub fn image_count(&self) -> usize {
        self.images.read().unwrap().len()
    }

    /// Number of stored variants across all images.
    pub fn variant_count(&self) -> usize {
        self.variants.read().unwrap().len()
    }

    fn next_id(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, AtomicOrdering::SeqCst) + 1
    }
}

fn column_value(entity: &EntityRecord, column: EntityColumn) -> Option<String> {
    match column {
        EntityColumn::Id => Some(entity.id.to_string()),
        EntityColumn::Name => Some(entity.name.clone()),
        EntityColumn::Abilities => entity.fields.abilities.clone(),
        EntityColumn::Born => entity.fields.born.clone(),
        EntityColumn::BondedWith => entity.fields.bonded_with.clone(),
        EntityColumn::Titles => entity.fields.titles.clone(),
        EntityColumn::Aliases => entity.fields.aliases.clone(),
        EntityColumn::Profession => entity.fields.profession.clone(),
        EntityColumn::Groups => entity.fields.groups.clone(),
        EntityColumn::Birthplace => entity.fields.birthplace.clone(),
        EntityColumn::Residence => entity.fields.residence.clone(),
        EntityColumn::Nationality => entity.fields.nationality.clone(),
    }
}

fn matches_filter(entity: &EntityRecord, filter: Option<&EntityFilter>) -> bool {
    match filter {
        None => true,
        Some(filter) => column_value(entity, filter.column).as_deref() == Some(&filter.value),
    }
}

fn compare_on(a: &EntityRecord, b: &EntityRecord, column: EntityColumn) -> Ordering {
    match column {
        EntityColumn::Id => a.id.cmp(&b.id),
        // Nulls sort first so they stay out of the way in ascending order
        _ => match (column_value(a, column), column_value(b, column)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp(&y),
        },
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_entity_by_name(&self, name: &str) -> StoreResult<Option<EntityRecord>> {
        Ok(self
            .entities
            .read()
            .unwrap()
            .iter()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn find_entity_by_id(&self, id: i64) -> StoreResult<Option<EntityRecord>> {
        Ok(self
            .entities
            .read()
            .unwrap()
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn find_entities(&self, query: &EntityQuery) -> StoreResult<Vec<EntityRecord>> {
        let entities = self.entities.read().unwrap();

        let mut matched: Vec<EntityRecord> = entities
            .iter()
            .filter(|e| matches_filter(e, query.filter.as_ref()))
            .cloned()
            .collect();

        // Cursor wins over explicit ordering; it only makes sense in
        // ascending-id order.
        if let Some(cursor) = query.cursor {
            matched.sort_by(|a, b| a.id.cmp(&b.id));
            matched.retain(|e| e.id > cursor);
        } else if let Some((column, order)) = query.order_by {
            matched.sort_by(|a, b| {
                let cmp = compare_on(a, b, column);
                match order {
                    SortOrder::Asc => cmp,
                    SortOrder::Desc => cmp.reverse(),
                }
            });
        } else {
            matched.sort_by(|a, b| a.id.cmp(&b.id));
        }

        let skip = query.skip.unwrap_or(0);
        Ok(matched.into_iter().skip(skip).take(query.limit()).collect())
    }

    async fn count_entities(&self, filter: Option<&EntityFilter>) -> StoreResult<u64> {
        Ok(self
            .entities
            .read()
            .unwrap()
            .iter()
            .filter(|e| matches_filter(e, filter))
            .count() as u64)
    }

    async fn create_entity(&self, entity: NewEntity) -> StoreResult<EntityRecord> {
        let mut entities = self.entities.write().unwrap();

        if entities.iter().any(|e| e.name == entity.name) {
            return Err(StoreError::DuplicateName { name: entity.name });
        }

        let record = EntityRecord {
            id: Self::next_id(&self.next_entity_id),
            name: entity.name,
            fields: entity.fields,
            image_id: entity.image_id,
            created_at: Utc::now(),
        };
        entities.push(record.clone());
        Ok(record)
    }

    async fn create_image(&self, image: NewImage) -> StoreResult<ImageRecord> {
        let record = ImageRecord {
            id: Self::next_id(&self.next_image_id),
            primary_src: image.primary_src,
            width: image.width,
            height: image.height,
        };
        self.images.write().unwrap().push(record.clone());
        Ok(record)
    }

    async fn create_image_variants(&self, image_id: i64, urls: &[String]) -> StoreResult<()> {
        let mut variants = self.variants.write().unwrap();
        for url in urls {
            variants.push(ImageVariant {
                id: Self::next_id(&self.next_variant_id),
                image_id,
                url: url.clone(),
            });
        }
        Ok(())
    }

    async fn find_image(&self, id: i64) -> StoreResult<Option<ImageRecord>> {
        Ok(self
            .images
            .read()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn image_variants(&self, image_id: i64) -> StoreResult<Vec<ImageVariant>> {
        Ok(self
            .variants
            .read()
            .unwrap()
            .iter()
            .filter(|v| v.image_id == image_id)
            .cloned()
            .collect())
    }
}
