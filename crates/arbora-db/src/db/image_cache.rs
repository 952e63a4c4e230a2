//! Resolved-image cache repository.
//!
//! The table is the persistent half of the read-through cache: unbounded
//! logical capacity, lazy eviction. Freshness is judged by the resolver, not
//! here; this layer only stores, fetches, and removes entries.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use arbora_core::models::ImageCacheEntry;
use arbora_core::AppError;

/// Persistence seam for the resolved-image cache.
#[async_trait]
pub trait ImageCacheStore: Send + Sync {
    /// Fetch an entry by tree name (case-sensitive).
    async fn get(&self, tree_name: &str) -> Result<Option<ImageCacheEntry>, AppError>;

    /// Insert or refresh an entry.
    async fn upsert(&self, entry: &ImageCacheEntry) -> Result<(), AppError>;

    /// Remove an entry; removing a missing entry is not an error.
    async fn remove(&self, tree_name: &str) -> Result<(), AppError>;
}

/// Postgres-backed image cache repository.
#[derive(Clone)]
pub struct ImageCacheRepository {
    pool: PgPool,
}

impl ImageCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageCacheStore for ImageCacheRepository {
    async fn get(&self, tree_name: &str) -> Result<Option<ImageCacheEntry>, AppError> {
        let row: Option<ImageCacheEntry> = sqlx::query_as::<Postgres, ImageCacheEntry>(
            "SELECT * FROM tree_image_cache WHERE tree_name = $1",
        )
        .bind(tree_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert(&self, entry: &ImageCacheEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tree_image_cache (tree_name, image_url, fetched_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (tree_name)
            DO UPDATE SET image_url = EXCLUDED.image_url, fetched_at = EXCLUDED.fetched_at
            "#,
        )
        .bind(&entry.tree_name)
        .bind(&entry.image_url)
        .bind(entry.fetched_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(tree_name = %entry.tree_name, "Image cache entry stored");
        Ok(())
    }

    async fn remove(&self, tree_name: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tree_image_cache WHERE tree_name = $1")
            .bind(tree_name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
