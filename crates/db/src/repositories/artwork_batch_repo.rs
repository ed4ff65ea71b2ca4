//! Repository for the `artwork_batches` table.

use proofdesk_core::artwork::model::{ArtworkBatch, NewBatch};
use proofdesk_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::artwork::ArtworkBatchRow;

/// Column list for artwork_batches queries.
const COLUMNS: &str = "id, batch_name, password_hash, status, customer_name, customer_email, \
    overall_comment, approved_by_name, approved_by_company, approved_at, total_items, \
    approved_count, rejected_count, version, password_version, created_by, created_at, \
    updated_at";

/// Provides CRUD operations for artwork batches.
pub struct ArtworkBatchRepo;

impl ArtworkBatchRepo {
    /// Insert a new, empty batch, returning the created row.
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        input: &NewBatch,
    ) -> Result<ArtworkBatchRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO artwork_batches
                (id, batch_name, password_hash, customer_name, customer_email, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtworkBatchRow>(&query)
            .bind(id)
            .bind(&input.batch_name)
            .bind(&input.password_hash)
            .bind(&input.customer_name)
            .bind(&input.customer_email)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    /// List all batches, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ArtworkBatchRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artwork_batches ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ArtworkBatchRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a batch by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ArtworkBatchRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artwork_batches WHERE id = $1");
        sqlx::query_as::<_, ArtworkBatchRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a batch and hold its row lock until the transaction ends.
    ///
    /// Every write that touches a batch's items takes this lock first, which
    /// serializes item commits and submission on the same batch.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<ArtworkBatchRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artwork_batches WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ArtworkBatchRow>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write the rollup, approval record and version of a locked batch.
    pub async fn save_state(
        tx: &mut Transaction<'_, Postgres>,
        batch: &ArtworkBatch,
    ) -> Result<ArtworkBatchRow, sqlx::Error> {
        let query = format!(
            "UPDATE artwork_batches SET
                status = $2,
                total_items = $3,
                approved_count = $4,
                rejected_count = $5,
                overall_comment = $6,
                approved_by_name = $7,
                approved_by_company = $8,
                approved_at = $9,
                version = $10,
                updated_at = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtworkBatchRow>(&query)
            .bind(batch.id)
            .bind(batch.status.as_str())
            .bind(batch.total_items)
            .bind(batch.approved_count)
            .bind(batch.rejected_count)
            .bind(&batch.overall_comment)
            .bind(&batch.approved_by_name)
            .bind(&batch.approved_by_company)
            .bind(batch.approved_at)
            .bind(batch.version)
            .bind(batch.updated_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Replace the password hash and bump the password generation.
    /// Returns `true` if a row was updated.
    pub async fn set_password_hash(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE artwork_batches
             SET password_hash = $2,
                 password_version = password_version + 1,
                 version = version + 1,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
