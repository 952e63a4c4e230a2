//! Verification record repository.
//!
//! Records are inserted once, after the photo is durable in the object store,
//! and never updated by the pipeline; moderation owns later status changes.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use arbora_core::models::{NewVerification, Verification, VerificationStatus};
use arbora_core::AppError;

/// Persistence seam for verification records.
///
/// The upload orchestrator only ever talks to `dyn VerificationStore`, which
/// keeps the pipeline testable without a database.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Insert a new record; returns the persisted row.
    async fn create(&self, new: NewVerification) -> Result<Verification, AppError>;

    /// Fetch one record scoped to its owner.
    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Verification>, AppError>;

    /// All records for an owner, newest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Verification>, AppError>;
}

/// Postgres-backed verification repository.
#[derive(Clone)]
pub struct VerificationRepository {
    pool: PgPool,
}

impl VerificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationStore for VerificationRepository {
    async fn create(&self, new: NewVerification) -> Result<Verification, AppError> {
        let id = Uuid::new_v4();
        let row: Verification = sqlx::query_as::<Postgres, Verification>(
            r#"
            INSERT INTO verifications (
                id, owner_id, match_id, tree_name, photo_key, photo_url,
                latitude, longitude, planted_on, notes, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.owner_id)
        .bind(new.match_id)
        .bind(&new.tree_name)
        .bind(&new.photo_key)
        .bind(&new.photo_url)
        .bind(new.location.map(|l| l.latitude))
        .bind(new.location.map(|l| l.longitude))
        .bind(new.planted_on)
        .bind(&new.notes)
        .bind(VerificationStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            id = %row.id,
            owner_id = %row.owner_id,
            tree_name = %row.tree_name,
            "Verification record created"
        );

        Ok(row)
    }

    async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Verification>, AppError> {
        let row: Option<Verification> = sqlx::query_as::<Postgres, Verification>(
            "SELECT * FROM verifications WHERE owner_id = $1 AND id = $2",
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Verification>, AppError> {
        let rows: Vec<Verification> = sqlx::query_as::<Postgres, Verification>(
            "SELECT * FROM verifications WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
