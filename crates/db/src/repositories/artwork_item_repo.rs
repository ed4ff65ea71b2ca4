//! Repository for the `artwork_batch_items` table.

use proofdesk_core::artwork::model::{ArtworkBatchItem, NewBatchItem};
use proofdesk_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgExecutor, Postgres, Transaction};

use crate::models::artwork::ArtworkBatchItemRow;

/// Column list for artwork_batch_items queries.
const COLUMNS: &str = "id, batch_id, name, file_url, file_type, file_size, source_link, \
    ai_analysis, status, approval_type, customer_comment, checklist, position, version, \
    created_at, updated_at";

/// Provides CRUD operations for artwork batch items.
pub struct ArtworkItemRepo;

impl ArtworkItemRepo {
    /// List the items of a batch in display order.
    pub async fn list_for_batch<'e, E: PgExecutor<'e>>(
        executor: E,
        batch_id: DbId,
    ) -> Result<Vec<ArtworkBatchItemRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artwork_batch_items
             WHERE batch_id = $1
             ORDER BY position ASC"
        );
        sqlx::query_as::<_, ArtworkBatchItemRow>(&query)
            .bind(batch_id)
            .fetch_all(executor)
            .await
    }

    /// Next free position in a batch. Call with the batch row locked.
    pub async fn next_position(
        tx: &mut Transaction<'_, Postgres>,
        batch_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM artwork_batch_items WHERE batch_id = $1",
        )
        .bind(batch_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Insert a pending item at `position`, returning the created row.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        batch_id: DbId,
        position: i32,
        input: &NewBatchItem,
    ) -> Result<ArtworkBatchItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO artwork_batch_items
                (id, batch_id, name, file_url, file_type, file_size, source_link,
                 ai_analysis, position)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtworkBatchItemRow>(&query)
            .bind(id)
            .bind(batch_id)
            .bind(input.name.trim())
            .bind(input.file_url.trim())
            .bind(&input.file_type)
            .bind(input.file_size)
            .bind(&input.source_link)
            .bind(input.ai_analysis.as_ref().map(Json))
            .bind(position)
            .fetch_one(&mut **tx)
            .await
    }

    /// Write a reviewed item's decision, checklist and version.
    pub async fn save_review(
        tx: &mut Transaction<'_, Postgres>,
        item: &ArtworkBatchItem,
    ) -> Result<ArtworkBatchItemRow, sqlx::Error> {
        let query = format!(
            "UPDATE artwork_batch_items SET
                status = $3,
                approval_type = $4,
                customer_comment = $5,
                checklist = $6,
                version = $7,
                updated_at = $8
             WHERE id = $1 AND batch_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtworkBatchItemRow>(&query)
            .bind(item.id)
            .bind(item.batch_id)
            .bind(item.status.as_str())
            .bind(item.approval_type.map(|t| t.as_str()))
            .bind(&item.customer_comment)
            .bind(Json(&item.checklist))
            .bind(item.version)
            .bind(item.updated_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete one item of a batch. Returns `true` if a row was deleted.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        batch_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artwork_batch_items WHERE id = $1 AND batch_id = $2")
            .bind(item_id)
            .bind(batch_id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
