//! SQLite storage implementation.
//!
//! A file-based backend using sqlx. Good for local development and
//! single-server deployments; `in_memory` gives tests a throwaway
//! database.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::error::{StoreError, StoreResult};
use crate::traits::store::EntityStore;
use crate::types::{
    entity::{EntityFields, EntityRecord, NewEntity},
    image::{ImageRecord, ImageVariant, NewImage},
    query::{EntityFilter, EntityQuery, SortOrder},
};

const ENTITY_COLUMNS: &str = r#"id, name, abilities, born, bonded_with, titles, aliases, profession, "groups", birthplace, residence, nationality, image_id, created_at"#;

/// SQLite-backed entity store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://./wikibio.db?mode=rwc` - File, create if not exists
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(StoreError::backend)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    ///
    /// Pinned to one connection so every query sees the same database.
    pub async fn in_memory() -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(StoreError::backend)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run idempotent schema migrations.
    async fn run_migrations(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                primary_src TEXT NOT NULL,
                width INTEGER,
                height INTEGER
            );

            CREATE TABLE IF NOT EXISTS image_variants (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                image_id INTEGER NOT NULL REFERENCES images(id),
                url TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_image_variants_image_id
                ON image_variants(image_id);

            CREATE TABLE IF NOT EXISTS entities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                abilities TEXT,
                born TEXT,
                bonded_with TEXT,
                titles TEXT,
                aliases TEXT,
                profession TEXT,
                "groups" TEXT,
                birthplace TEXT,
                residence TEXT,
                nationality TEXT,
                image_id INTEGER REFERENCES images(id),
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entities_name ON entities(name);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// Row types for sqlx queries
#[derive(Debug, FromRow)]
struct EntityRow {
    id: i64,
    name: String,
    abilities: Option<String>,
    born: Option<String>,
    bonded_with: Option<String>,
    titles: Option<String>,
    aliases: Option<String>,
    profession: Option<String>,
    groups: Option<String>,
    birthplace: Option<String>,
    residence: Option<String>,
    nationality: Option<String>,
    image_id: Option<i64>,
    created_at: String,
}

impl EntityRow {
    fn into_record(self) -> StoreResult<EntityRecord> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| StoreError::backend(format!("invalid date: {e}")))?
            .with_timezone(&chrono::Utc);

        Ok(EntityRecord {
            id: self.id,
            name: self.name,
            fields: EntityFields {
                abilities: self.abilities,
                born: self.born,
                bonded_with: self.bonded_with,
                titles: self.titles,
                aliases: self.aliases,
                profession: self.profession,
                groups: self.groups,
                birthplace: self.birthplace,
                residence: self.residence,
                nationality: self.nationality,
            },
            image_id: self.image_id,
            created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ImageRow {
    id: i64,
    primary_src: String,
    width: Option<i64>,
    height: Option<i64>,
}

impl ImageRow {
    fn into_record(self) -> ImageRecord {
        ImageRecord {
            id: self.id,
            primary_src: self.primary_src,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, FromRow)]
struct VariantRow {
    id: i64,
    image_id: i64,
    url: String,
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn find_entity_by_name(&self, name: &str) -> StoreResult<Option<EntityRecord>> {
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE name = ?");
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(EntityRow::into_record).transpose()
    }

    async fn find_entity_by_id(&self, id: i64) -> StoreResult<Option<EntityRecord>> {
        let sql = format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?");
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(EntityRow::into_record).transpose()
    }

    async fn find_entities(&self, query: &EntityQuery) -> StoreResult<Vec<EntityRecord>> {
        let mut sql = format!("SELECT {ENTITY_COLUMNS} FROM entities");
        let mut clauses: Vec<String> = Vec::new();

        if let Some(filter) = &query.filter {
            // Column names come from the EntityColumn enum, never from
            // caller strings.
            clauses.push(format!(r#""{}" = ?"#, filter.column.as_str()));
        }
        if query.cursor.is_some() {
            clauses.push("id > ?".to_string());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        // Cursor pagination is ascending-id by contract and wins over
        // an explicit ordering.
        if query.cursor.is_some() {
            sql.push_str(" ORDER BY id ASC");
        } else if let Some((column, order)) = query.order_by {
            let direction = match order {
                SortOrder::Asc => "ASC",
                SortOrder::Desc => "DESC",
            };
            sql.push_str(&format!(r#" ORDER BY "{}" {direction}"#, column.as_str()));
        } else {
            sql.push_str(" ORDER BY id ASC");
        }

        sql.push_str(" LIMIT ? OFFSET ?");

        let mut q = sqlx::query_as::<_, EntityRow>(&sql);
        if let Some(filter) = &query.filter {
            q = q.bind(&filter.value);
        }
        if let Some(cursor) = query.cursor {
            q = q.bind(cursor);
        }
        q = q
            .bind(query.limit() as i64)
            .bind(query.skip.unwrap_or(0) as i64);

        let rows = q.fetch_all(&self.pool).await.map_err(StoreError::backend)?;
        rows.into_iter().map(EntityRow::into_record).collect()
    }

    async fn count_entities(&self, filter: Option<&EntityFilter>) -> StoreResult<u64> {
        let count: i64 = match filter {
            None => sqlx::query_scalar("SELECT COUNT(*) FROM entities")
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::backend)?,
            Some(filter) => {
                let sql = format!(
                    r#"SELECT COUNT(*) FROM entities WHERE "{}" = ?"#,
                    filter.column.as_str()
                );
                sqlx::query_scalar(&sql)
                    .bind(&filter.value)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(StoreError::backend)?
            }
        };

        Ok(count as u64)
    }

    async fn create_entity(&self, entity: NewEntity) -> StoreResult<EntityRecord> {
        let created_at = Utc::now();
        let sql = r#"
            INSERT INTO entities
                (name, abilities, born, bonded_with, titles, aliases, profession,
                 "groups", birthplace, residence, nationality, image_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#;

        let result = sqlx::query(sql)
            .bind(&entity.name)
            .bind(&entity.fields.abilities)
            .bind(&entity.fields.born)
            .bind(&entity.fields.bonded_with)
            .bind(&entity.fields.titles)
            .bind(&entity.fields.aliases)
            .bind(&entity.fields.profession)
            .bind(&entity.fields.groups)
            .bind(&entity.fields.birthplace)
            .bind(&entity.fields.residence)
            .bind(&entity.fields.nationality)
            .bind(entity.image_id)
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|d| d.is_unique_violation())
                {
                    StoreError::DuplicateName {
                        name: entity.name.clone(),
                    }
                } else {
                    StoreError::backend(e)
                }
            })?;

        Ok(EntityRecord {
            id: result.last_insert_rowid(),
            name: entity.name,
            fields: entity.fields,
            image_id: entity.image_id,
            created_at,
        })
    }

    async fn create_image(&self, image: NewImage) -> StoreResult<ImageRecord> {
        let result = sqlx::query("INSERT INTO images (primary_src, width, height) VALUES (?, ?, ?)")
            .bind(&image.primary_src)
            .bind(image.width)
            .bind(image.height)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(ImageRecord {
            id: result.last_insert_rowid(),
            primary_src: image.primary_src,
            width: image.width,
            height: image.height,
        })
    }

    async fn create_image_variants(&self, image_id: i64, urls: &[String]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        for url in urls {
            sqlx::query("INSERT INTO image_variants (image_id, url) VALUES (?, ?)")
                .bind(image_id)
                .bind(url)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::backend)?;
        }

        tx.commit().await.map_err(StoreError::backend)
    }

    async fn find_image(&self, id: i64) -> StoreResult<Option<ImageRecord>> {
        let row = sqlx::query_as::<_, ImageRow>(
            "SELECT id, primary_src, width, height FROM images WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(ImageRow::into_record))
    }

    async fn image_variants(&self, image_id: i64) -> StoreResult<Vec<ImageVariant>> {
        let rows = sqlx::query_as::<_, VariantRow>(
            "SELECT id, image_id, url FROM image_variants WHERE image_id = ? ORDER BY id ASC",
        )
        .bind(image_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows
            .into_iter()
            .map(|v| ImageVariant {
                id: v.id,
                image_id: v.image_id,
                url: v.url,
            })
            .collect())
    }
}
