//! Item review engine.
//!
//! Validates a customer's decision on one item before anything is written.
//! An item moves `pending -> approved` or `pending -> rejected`; until the
//! batch is finalized a decided item may be reviewed again, which passes
//! through the same checks.
//!
//! Storage is not touched here. [`prepare_commit`] produces a
//! [`ReviewCommit`] that an [`ArtworkStore`](crate::artwork::store::ArtworkStore)
//! applies together with the batch rollup.

use serde::Deserialize;
use uuid::Uuid;

use crate::artwork::checklist::Checklist;
use crate::artwork::decision::Decision;
use crate::artwork::model::{ArtworkBatch, ArtworkBatchItem};
use crate::artwork::status::{ApprovalType, ItemStatus};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// The review session a request belongs to.
///
/// Issued by the access gate; every engine call is scoped to exactly one
/// batch so concurrent sessions never share in-flight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewContext {
    pub batch_id: DbId,
    pub session_id: Uuid,
}

/// A customer's decision on one item as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemReviewInput {
    pub approval_type: ApprovalType,
    pub customer_comment: Option<String>,
    #[serde(default)]
    pub checklist: Checklist,
    /// Item version the client last saw. Omit to overwrite unconditionally.
    pub expected_version: Option<i32>,
}

/// A validated item decision, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommit {
    pub batch_id: DbId,
    pub item_id: DbId,
    pub session_id: Uuid,
    pub decision: Decision,
    pub checklist: Checklist,
    pub expected_version: Option<i32>,
}

impl ReviewCommit {
    pub fn status(&self) -> ItemStatus {
        self.decision.status()
    }

    pub fn approval_type(&self) -> ApprovalType {
        self.decision.approval_type()
    }

    pub fn customer_comment(&self) -> Option<String> {
        self.decision.comment().map(str::to_string)
    }

    /// Whether `item` already holds exactly this decision.
    pub fn is_applied_to(&self, item: &ArtworkBatchItem) -> bool {
        item.status == self.status()
            && item.approval_type == Some(self.approval_type())
            && item.customer_comment.as_deref() == self.decision.comment()
            && item.checklist == self.checklist
    }

    /// Write the decision onto an item record and bump its version.
    pub fn apply_to(&self, item: &mut ArtworkBatchItem, now: Timestamp) {
        item.status = self.status();
        item.approval_type = Some(self.approval_type());
        item.customer_comment = self.customer_comment();
        item.checklist = self.checklist.clone();
        item.version += 1;
        item.updated_at = now;
    }
}

/// Outcome of comparing a commit's expected version with the stored item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    /// The commit applies to the current item state.
    Current,
    /// The item already holds this decision; the commit is a resubmission.
    Replay,
}

/// Validate a customer's decision on `item`.
///
/// Fails without side effects when:
/// - the item or batch is outside the session's batch (`NotFound`),
/// - the batch has been finalized (`BatchFinalized`),
/// - a rejection has no comment (`CommentRequired`),
/// - an approval has unchecked checklist items (`ChecklistIncomplete`).
pub fn prepare_commit(
    ctx: &ReviewContext,
    batch: &ArtworkBatch,
    item: &ArtworkBatchItem,
    input: ItemReviewInput,
) -> Result<ReviewCommit, CoreError> {
    if batch.id != ctx.batch_id || item.batch_id != ctx.batch_id {
        return Err(CoreError::NotFound {
            entity: "ArtworkBatchItem",
            id: item.id,
        });
    }
    if batch.is_finalized() {
        return Err(CoreError::BatchFinalized);
    }

    let decision = Decision::from_parts(input.approval_type, input.customer_comment.as_deref())?;

    if decision.approval_type().requires_checklist() && !input.checklist.is_complete() {
        return Err(CoreError::ChecklistIncomplete {
            missing: input.checklist.missing(),
        });
    }

    Ok(ReviewCommit {
        batch_id: ctx.batch_id,
        item_id: item.id,
        session_id: ctx.session_id,
        decision,
        checklist: input.checklist,
        expected_version: input.expected_version,
    })
}

/// Check optimistic concurrency for a commit against the stored item.
///
/// A commit whose decision the item already holds is a replay, whatever
/// version it names, so resubmitting never bumps the version. Otherwise a
/// stale expected version is a conflict.
pub fn check_version(
    item: &ArtworkBatchItem,
    commit: &ReviewCommit,
) -> Result<VersionCheck, CoreError> {
    if commit.is_applied_to(item) {
        return Ok(VersionCheck::Replay);
    }
    match commit.expected_version {
        Some(expected) if expected != item.version => Err(CoreError::Conflict(format!(
            "Artwork '{}' was changed by another review session; reload and try again",
            item.name
        ))),
        _ => Ok(VersionCheck::Current),
    }
}
