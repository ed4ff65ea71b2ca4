//! Customer and staff operations over an [`ArtworkStore`].
//!
//! Each function validates with the pure engine modules first and only then
//! calls into the store, so a rejected request never writes anything.

use serde::Serialize;

use crate::artwork::model::{
    validate_batch_name, validate_customer_email, validate_new_item, ArtworkBatch,
    ArtworkBatchItem, BatchSummary, NewBatch, NewBatchItem,
};
use crate::artwork::review::{prepare_commit, ItemReviewInput, ReviewContext};
use crate::artwork::rollup::{compute_rollup, BatchRollup};
use crate::artwork::store::{ArtworkStore, ReviewOutcome};
use crate::artwork::submission::{ApproverSignature, SubmissionInput};
use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of items accepted in one add call.
pub const MAX_ITEMS_PER_REQUEST: usize = 200;

/// A batch with its items and a rollup derived from those items.
#[derive(Debug, Clone, Serialize)]
pub struct BatchView {
    pub batch: ArtworkBatch,
    pub items: Vec<ArtworkBatchItem>,
    pub rollup: BatchRollup,
}

async fn require_batch(store: &dyn ArtworkStore, batch_id: DbId) -> Result<ArtworkBatch, CoreError> {
    store.find_batch(batch_id).await?.ok_or(CoreError::NotFound {
        entity: "ArtworkBatch",
        id: batch_id,
    })
}

/// The public gate summary of a batch.
pub async fn batch_summary(
    store: &dyn ArtworkStore,
    batch_id: DbId,
) -> Result<BatchSummary, CoreError> {
    let batch = require_batch(store, batch_id).await?;
    Ok(BatchSummary::from(&batch))
}

/// Load a batch with its items.
///
/// The rollup is recomputed from the items on every read. For an open batch
/// a cached rollup that disagrees is replaced in the returned view.
pub async fn load_batch(store: &dyn ArtworkStore, batch_id: DbId) -> Result<BatchView, CoreError> {
    let mut batch = require_batch(store, batch_id).await?;
    let items = store.list_items(batch_id).await?;
    let rollup = compute_rollup(items.iter().map(|item| item.status));

    if !batch.is_finalized() && !batch.matches_rollup(&rollup) {
        tracing::warn!(
            batch_id = %batch_id,
            cached_status = %batch.status,
            derived_status = %rollup.status,
            "Cached batch rollup is stale, serving derived values"
        );
        batch.apply_rollup(&rollup);
    }

    Ok(BatchView {
        batch,
        items,
        rollup,
    })
}

/// Validate and persist a customer's decision on one item.
pub async fn review_item(
    store: &dyn ArtworkStore,
    ctx: &ReviewContext,
    item_id: DbId,
    input: ItemReviewInput,
) -> Result<ReviewOutcome, CoreError> {
    let batch = require_batch(store, ctx.batch_id).await?;
    let items = store.list_items(ctx.batch_id).await?;
    let item = items
        .iter()
        .find(|item| item.id == item_id)
        .ok_or(CoreError::NotFound {
            entity: "ArtworkBatchItem",
            id: item_id,
        })?;

    let commit = prepare_commit(ctx, &batch, item, input)?;
    let outcome = store.commit_item_review(&commit).await?;

    tracing::info!(
        batch_id = %ctx.batch_id,
        item_id = %item_id,
        session_id = %ctx.session_id,
        approval_type = %commit.approval_type(),
        batch_status = %outcome.batch.status,
        replayed = outcome.replayed,
        "Artwork item reviewed"
    );

    Ok(outcome)
}

/// Finalize a fully reviewed batch.
pub async fn submit_batch(
    store: &dyn ArtworkStore,
    ctx: &ReviewContext,
    input: SubmissionInput,
) -> Result<ArtworkBatch, CoreError> {
    let signature = ApproverSignature::new(input)?;
    let batch = store.commit_submission(ctx.batch_id, signature).await?;

    tracing::info!(
        batch_id = %batch.id,
        session_id = %ctx.session_id,
        status = %batch.status,
        approved_count = batch.approved_count,
        rejected_count = batch.rejected_count,
        approved_by = batch.approved_by_name.as_deref().unwrap_or_default(),
        "Artwork batch finalized"
    );

    Ok(batch)
}

/// Staff input for a new batch. The password has already been hashed.
#[derive(Debug, Clone)]
pub struct CreateBatchInput {
    pub batch_name: String,
    pub password_hash: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub created_by: Option<String>,
}

/// Validate and create a new, empty batch.
pub async fn create_batch(
    store: &dyn ArtworkStore,
    input: CreateBatchInput,
) -> Result<ArtworkBatch, CoreError> {
    let new_batch = NewBatch {
        batch_name: validate_batch_name(&input.batch_name)?,
        password_hash: input.password_hash,
        customer_name: input
            .customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        customer_email: validate_customer_email(input.customer_email.as_deref())?,
        created_by: input.created_by,
    };
    let batch = store.create_batch(new_batch).await?;
    tracing::info!(batch_id = %batch.id, batch_name = %batch.batch_name, "Artwork batch created");
    Ok(batch)
}

/// Validate and append items to an open batch.
pub async fn add_items(
    store: &dyn ArtworkStore,
    batch_id: DbId,
    items: Vec<NewBatchItem>,
) -> Result<Vec<ArtworkBatchItem>, CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation("At least one item is required".into()));
    }
    if items.len() > MAX_ITEMS_PER_REQUEST {
        return Err(CoreError::Validation(format!(
            "At most {MAX_ITEMS_PER_REQUEST} items may be added per request"
        )));
    }
    for item in &items {
        validate_new_item(item)?;
    }

    let created = store.add_items(batch_id, items).await?;
    tracing::info!(batch_id = %batch_id, count = created.len(), "Artwork items added");
    Ok(created)
}

/// Remove one item from an open batch.
///
/// The rollup is re-derived from the remaining items, so removing the last
/// pending item of a partial batch settles it as approved or rejected.
pub async fn remove_item(
    store: &dyn ArtworkStore,
    batch_id: DbId,
    item_id: DbId,
) -> Result<ArtworkBatch, CoreError> {
    let batch = store.remove_item(batch_id, item_id).await?;
    tracing::info!(
        batch_id = %batch_id,
        item_id = %item_id,
        status = %batch.status,
        total_items = batch.total_items,
        "Artwork item removed"
    );
    Ok(batch)
}
