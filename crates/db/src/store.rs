//! [`ArtworkStore`] backed by Postgres.
//!
//! Every write that touches a batch's items (commit, addition, removal and
//! submission) runs in one transaction that first locks the batch row
//! (`SELECT ... FOR UPDATE`). The rollup is
//! re-derived from the item rows read under that lock, so concurrent
//! sessions on the same batch cannot lose each other's updates.

use std::future::Future;

use async_trait::async_trait;
use chrono::Utc;
use proofdesk_core::artwork::model::{ArtworkBatch, ArtworkBatchItem, NewBatch, NewBatchItem};
use proofdesk_core::artwork::review::{check_version, ReviewCommit, VersionCheck};
use proofdesk_core::artwork::rollup::compute_rollup;
use proofdesk_core::artwork::store::{ArtworkStore, ReviewOutcome};
use proofdesk_core::artwork::submission::{finalize, ApproverSignature};
use proofdesk_core::error::CoreError;
use proofdesk_core::types::{new_id, DbId};
use sqlx::{Postgres, Transaction};

use crate::models::artwork::into_domain;
use crate::repositories::{ArtworkBatchRepo, ArtworkItemRepo};
use crate::DbPool;

/// Attempts for a transaction that fails with a serialization failure or deadlock.
const MAX_ATTEMPTS: u32 = 3;

/// SQLSTATE codes worth retrying: serialization_failure, deadlock_detected.
const TRANSIENT_CODES: [&str; 2] = ["40001", "40P01"];

/// SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/* --------------------------------------------------------------------------
Error plumbing
-------------------------------------------------------------------------- */

/// Failure inside a store transaction.
enum TxError {
    Db(sqlx::Error),
    Domain(CoreError),
}

impl From<sqlx::Error> for TxError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err)
    }
}

impl From<CoreError> for TxError {
    fn from(err: CoreError) -> Self {
        Self::Domain(err)
    }
}

impl From<TxError> for CoreError {
    fn from(err: TxError) -> Self {
        match err {
            TxError::Db(err) => persistence_error(err),
            TxError::Domain(err) => err,
        }
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| TRANSIENT_CODES.iter().any(|transient| *transient == code)),
        _ => false,
    }
}

/// Map a sqlx error onto the domain error surfaced to callers.
pub fn persistence_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            tracing::warn!(error = %db_err, "Unique constraint violated");
            return CoreError::Conflict(
                "The batch was modified concurrently; reload and try again".into(),
            );
        }
    }
    tracing::error!(error = %err, "Database operation failed");
    CoreError::Persistence(err.to_string())
}

/// Run `op` until it succeeds, fails permanently, or runs out of attempts.
async fn with_retry<T, F, Fut>(operation: &'static str, mut op: F) -> Result<T, CoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TxError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(TxError::Db(err)) if attempt < MAX_ATTEMPTS && is_transient(&err) => {
                tracing::warn!(operation, attempt, error = %err, "Transient database error, retrying");
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn batch_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "ArtworkBatch",
        id,
    }
}

/* --------------------------------------------------------------------------
Store
-------------------------------------------------------------------------- */

#[derive(Clone)]
pub struct PgArtworkStore {
    pool: DbPool,
}

impl PgArtworkStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Lock a batch row and convert it, failing for unknown ids.
    async fn lock_batch(
        tx: &mut Transaction<'_, Postgres>,
        batch_id: DbId,
    ) -> Result<ArtworkBatch, TxError> {
        let row = ArtworkBatchRepo::lock_for_update(tx, batch_id)
            .await?
            .ok_or_else(|| batch_not_found(batch_id))?;
        Ok(ArtworkBatch::try_from(row)?)
    }

    async fn load_items(
        tx: &mut Transaction<'_, Postgres>,
        batch_id: DbId,
    ) -> Result<Vec<ArtworkBatchItem>, TxError> {
        let rows = ArtworkItemRepo::list_for_batch(&mut **tx, batch_id).await?;
        Ok(into_domain(rows)?)
    }

    async fn try_add_items(
        &self,
        batch_id: DbId,
        inputs: &[NewBatchItem],
    ) -> Result<Vec<ArtworkBatchItem>, TxError> {
        let mut tx = self.pool.begin().await?;
        let mut batch = Self::lock_batch(&mut tx, batch_id).await?;
        if batch.is_finalized() {
            return Err(CoreError::BatchFinalized.into());
        }

        let first_position = ArtworkItemRepo::next_position(&mut tx, batch_id).await?;
        let mut created = Vec::with_capacity(inputs.len());
        for (offset, input) in inputs.iter().enumerate() {
            let position = first_position + offset as i32;
            let row = ArtworkItemRepo::insert(&mut tx, new_id(), batch_id, position, input).await?;
            created.push(ArtworkBatchItem::try_from(row)?);
        }

        let items = Self::load_items(&mut tx, batch_id).await?;
        batch.apply_rollup(&compute_rollup(items.iter().map(|item| item.status)));
        batch.version += 1;
        batch.updated_at = Utc::now();
        ArtworkBatchRepo::save_state(&mut tx, &batch).await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn try_commit_review(&self, commit: &ReviewCommit) -> Result<ReviewOutcome, TxError> {
        let mut tx = self.pool.begin().await?;
        let mut batch = Self::lock_batch(&mut tx, commit.batch_id).await?;
        if batch.is_finalized() {
            return Err(CoreError::BatchFinalized.into());
        }

        let mut items = Self::load_items(&mut tx, commit.batch_id).await?;
        let index = items
            .iter()
            .position(|item| item.id == commit.item_id)
            .ok_or(CoreError::NotFound {
                entity: "ArtworkBatchItem",
                id: commit.item_id,
            })?;

        if check_version(&items[index], commit)? == VersionCheck::Replay {
            // Dropping the transaction releases the lock without writing.
            return Ok(ReviewOutcome {
                item: items.swap_remove(index),
                batch,
                replayed: true,
            });
        }

        let now = Utc::now();
        commit.apply_to(&mut items[index], now);
        let row = ArtworkItemRepo::save_review(&mut tx, &items[index]).await?;
        let item = ArtworkBatchItem::try_from(row)?;

        batch.apply_rollup(&compute_rollup(items.iter().map(|item| item.status)));
        batch.version += 1;
        batch.updated_at = now;
        let batch = ArtworkBatch::try_from(ArtworkBatchRepo::save_state(&mut tx, &batch).await?)?;

        tx.commit().await?;
        Ok(ReviewOutcome {
            item,
            batch,
            replayed: false,
        })
    }

    async fn try_remove_item(
        &self,
        batch_id: DbId,
        item_id: DbId,
    ) -> Result<ArtworkBatch, TxError> {
        let mut tx = self.pool.begin().await?;
        let mut batch = Self::lock_batch(&mut tx, batch_id).await?;
        if batch.is_finalized() {
            return Err(CoreError::BatchFinalized.into());
        }

        if !ArtworkItemRepo::delete(&mut tx, batch_id, item_id).await? {
            return Err(CoreError::NotFound {
                entity: "ArtworkBatchItem",
                id: item_id,
            }
            .into());
        }

        let items = Self::load_items(&mut tx, batch_id).await?;
        batch.apply_rollup(&compute_rollup(items.iter().map(|item| item.status)));
        batch.version += 1;
        batch.updated_at = Utc::now();
        let batch = ArtworkBatch::try_from(ArtworkBatchRepo::save_state(&mut tx, &batch).await?)?;

        tx.commit().await?;
        Ok(batch)
    }

    async fn try_submit(
        &self,
        batch_id: DbId,
        signature: ApproverSignature,
    ) -> Result<ArtworkBatch, TxError> {
        let mut tx = self.pool.begin().await?;
        let mut batch = Self::lock_batch(&mut tx, batch_id).await?;
        let items = Self::load_items(&mut tx, batch_id).await?;

        let approval = finalize(
            &batch,
            items.iter().map(|item| item.status),
            signature,
            Utc::now(),
        )?;
        approval.apply_to(&mut batch);
        let batch = ArtworkBatch::try_from(ArtworkBatchRepo::save_state(&mut tx, &batch).await?)?;

        tx.commit().await?;
        Ok(batch)
    }
}

#[async_trait]
impl ArtworkStore for PgArtworkStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(persistence_error)
    }

    async fn create_batch(&self, input: NewBatch) -> Result<ArtworkBatch, CoreError> {
        let row = ArtworkBatchRepo::create(&self.pool, new_id(), &input)
            .await
            .map_err(persistence_error)?;
        ArtworkBatch::try_from(row)
    }

    async fn add_items(
        &self,
        batch_id: DbId,
        items: Vec<NewBatchItem>,
    ) -> Result<Vec<ArtworkBatchItem>, CoreError> {
        with_retry("add_items", || self.try_add_items(batch_id, &items)).await
    }

    async fn list_batches(&self) -> Result<Vec<ArtworkBatch>, CoreError> {
        let rows = ArtworkBatchRepo::list(&self.pool)
            .await
            .map_err(persistence_error)?;
        into_domain(rows)
    }

    async fn find_batch(&self, id: DbId) -> Result<Option<ArtworkBatch>, CoreError> {
        ArtworkBatchRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence_error)?
            .map(ArtworkBatch::try_from)
            .transpose()
    }

    async fn list_items(&self, batch_id: DbId) -> Result<Vec<ArtworkBatchItem>, CoreError> {
        let rows = ArtworkItemRepo::list_for_batch(&self.pool, batch_id)
            .await
            .map_err(persistence_error)?;
        into_domain(rows)
    }

    async fn remove_item(&self, batch_id: DbId, item_id: DbId) -> Result<ArtworkBatch, CoreError> {
        with_retry("remove_item", || self.try_remove_item(batch_id, item_id)).await
    }

    async fn set_password_hash(
        &self,
        batch_id: DbId,
        password_hash: &str,
    ) -> Result<bool, CoreError> {
        ArtworkBatchRepo::set_password_hash(&self.pool, batch_id, password_hash)
            .await
            .map_err(persistence_error)
    }

    async fn commit_item_review(&self, commit: &ReviewCommit) -> Result<ReviewOutcome, CoreError> {
        with_retry("commit_item_review", || self.try_commit_review(commit)).await
    }

    async fn commit_submission(
        &self,
        batch_id: DbId,
        signature: ApproverSignature,
    ) -> Result<ArtworkBatch, CoreError> {
        with_retry("commit_submission", || {
            self.try_submit(batch_id, signature.clone())
        })
        .await
    }
}
