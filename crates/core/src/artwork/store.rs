//! Persistence boundary for batches and items.
//!
//! Implementations must make [`ArtworkStore::commit_item_review`] and
//! [`ArtworkStore::commit_submission`] atomic: the item write (or approval
//! record) and the batch rollup derived from it land together or not at all,
//! and concurrent commits on the same batch are serialized.

use async_trait::async_trait;
use serde::Serialize;

use crate::artwork::model::{ArtworkBatch, ArtworkBatchItem, NewBatch, NewBatchItem};
use crate::artwork::review::ReviewCommit;
use crate::artwork::submission::ApproverSignature;
use crate::error::CoreError;
use crate::types::DbId;

/// Result of a persisted item review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub item: ArtworkBatchItem,
    pub batch: ArtworkBatch,
    /// True when the item already held this decision and nothing was written.
    pub replayed: bool,
}

#[async_trait]
pub trait ArtworkStore: Send + Sync {
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;

    /// Insert a new, empty batch.
    async fn create_batch(&self, input: NewBatch) -> Result<ArtworkBatch, CoreError>;

    /// Append items to a batch and re-derive its rollup.
    ///
    /// Fails with `NotFound` for an unknown batch and `BatchFinalized` once
    /// the batch has been submitted.
    async fn add_items(
        &self,
        batch_id: DbId,
        items: Vec<NewBatchItem>,
    ) -> Result<Vec<ArtworkBatchItem>, CoreError>;

    /// All batches, newest first.
    async fn list_batches(&self) -> Result<Vec<ArtworkBatch>, CoreError>;

    async fn find_batch(&self, id: DbId) -> Result<Option<ArtworkBatch>, CoreError>;

    /// Items of a batch in stable display order.
    async fn list_items(&self, batch_id: DbId) -> Result<Vec<ArtworkBatchItem>, CoreError>;

    /// Remove one item from an open batch and re-derive the rollup.
    ///
    /// Returns the updated batch. Fails with `NotFound` when the batch or the
    /// item (within that batch) is unknown and `BatchFinalized` once the batch
    /// has been submitted.
    async fn remove_item(&self, batch_id: DbId, item_id: DbId) -> Result<ArtworkBatch, CoreError>;

    /// Replace a batch's password hash and bump its password generation.
    ///
    /// Returns `false` if the batch does not exist.
    async fn set_password_hash(&self, batch_id: DbId, password_hash: &str)
        -> Result<bool, CoreError>;

    /// Persist a validated item decision and the batch rollup in one atomic step.
    ///
    /// Must re-check, under the batch lock, that the batch is not finalized
    /// and that the commit's expected version is still current (see
    /// [`check_version`](crate::artwork::review::check_version)).
    async fn commit_item_review(&self, commit: &ReviewCommit) -> Result<ReviewOutcome, CoreError>;

    /// Finalize a batch in one atomic step.
    ///
    /// Reads the item statuses under the batch lock and gates through
    /// [`finalize`](crate::artwork::submission::finalize).
    async fn commit_submission(
        &self,
        batch_id: DbId,
        signature: ApproverSignature,
    ) -> Result<ArtworkBatch, CoreError>;
}
