//! Final submission of a reviewed batch.
//!
//! Submission records who ratified the outcome and closes the batch. It is
//! only possible once every item has a decision, and the final status is
//! re-derived from the item statuses at submission time.

use serde::{Deserialize, Serialize};

use crate::artwork::model::ArtworkBatch;
use crate::artwork::rollup::{compute_rollup, BatchRollup};
use crate::artwork::status::{BatchStatus, ItemStatus};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Maximum length for approver name and company.
pub const MAX_APPROVER_FIELD_LENGTH: usize = 200;

/// Maximum length for the overall comment.
pub const MAX_OVERALL_COMMENT_LENGTH: usize = 5_000;

/// Submission form as sent by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionInput {
    pub approver_name: String,
    pub approver_company: Option<String>,
    pub overall_comment: Option<String>,
}

/// Validated approver identity and comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApproverSignature {
    pub name: String,
    pub company: Option<String>,
    pub overall_comment: Option<String>,
}

impl ApproverSignature {
    /// Trim and validate the submission form.
    pub fn new(input: SubmissionInput) -> Result<Self, CoreError> {
        let name = input.approver_name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Approver name is required".into()));
        }
        if name.chars().count() > MAX_APPROVER_FIELD_LENGTH {
            return Err(CoreError::Validation(format!(
                "Approver name must be at most {MAX_APPROVER_FIELD_LENGTH} characters"
            )));
        }

        let company = non_blank(input.approver_company);
        if company
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_APPROVER_FIELD_LENGTH)
        {
            return Err(CoreError::Validation(format!(
                "Approver company must be at most {MAX_APPROVER_FIELD_LENGTH} characters"
            )));
        }

        let overall_comment = non_blank(input.overall_comment);
        if overall_comment
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_OVERALL_COMMENT_LENGTH)
        {
            return Err(CoreError::Validation(format!(
                "Overall comment must be at most {MAX_OVERALL_COMMENT_LENGTH} characters"
            )));
        }

        Ok(Self {
            name: name.to_string(),
            company,
            overall_comment,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The approval record a successful submission writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalApproval {
    pub signature: ApproverSignature,
    pub rollup: BatchRollup,
    pub approved_at: Timestamp,
}

impl FinalApproval {
    /// Terminal batch status: `rejected` if any item was rejected, else `approved`.
    pub fn status(&self) -> BatchStatus {
        self.rollup.status
    }

    /// Write the approval record onto the batch.
    pub fn apply_to(&self, batch: &mut ArtworkBatch) {
        batch.apply_rollup(&self.rollup);
        batch.approved_by_name = Some(self.signature.name.clone());
        batch.approved_by_company = self.signature.company.clone();
        batch.overall_comment = self.signature.overall_comment.clone();
        batch.approved_at = Some(self.approved_at);
        batch.version += 1;
        batch.updated_at = self.approved_at;
    }
}

/// Gate and derive the final approval for `batch`.
///
/// `statuses` must be the current status of every item in the batch, read in
/// the same transaction that will write the result. Fails with
/// `BatchFinalized` if the batch was already submitted and with
/// `ReviewIncomplete` if the batch is empty or any item is still pending.
pub fn finalize<I>(
    batch: &ArtworkBatch,
    statuses: I,
    signature: ApproverSignature,
    now: Timestamp,
) -> Result<FinalApproval, CoreError>
where
    I: IntoIterator<Item = ItemStatus>,
{
    if batch.is_finalized() {
        return Err(CoreError::BatchFinalized);
    }

    let rollup = compute_rollup(statuses);
    if !rollup.is_fully_decided() {
        return Err(CoreError::ReviewIncomplete {
            pending: rollup.pending_count,
        });
    }

    Ok(FinalApproval {
        signature,
        rollup,
        approved_at: now,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::types::new_id;
    use ItemStatus::{Approved, Pending, Rejected};

    fn open_batch(status: BatchStatus) -> ArtworkBatch {
        let now = chrono::Utc::now();
        ArtworkBatch {
            id: new_id(),
            batch_name: "91".into(),
            password_hash: String::new(),
            status,
            customer_name: None,
            customer_email: None,
            overall_comment: None,
            approved_by_name: None,
            approved_by_company: None,
            approved_at: None,
            total_items: 3,
            approved_count: 0,
            rejected_count: 0,
            version: 4,
            password_version: 0,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn signature(name: &str) -> ApproverSignature {
        ApproverSignature::new(SubmissionInput {
            approver_name: name.to_string(),
            approver_company: None,
            overall_comment: None,
        })
        .unwrap()
    }

    #[test]
    fn test_signature_requires_name() {
        let result = ApproverSignature::new(SubmissionInput {
            approver_name: "   ".into(),
            approver_company: Some("Brand Co".into()),
            overall_comment: None,
        });
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("name"));
    }

    #[test]
    fn test_signature_trims_and_drops_blank_optionals() {
        let sig = ApproverSignature::new(SubmissionInput {
            approver_name: "  Jane Doe ".into(),
            approver_company: Some("  ".into()),
            overall_comment: Some(" Looks great ".into()),
        })
        .unwrap();
        assert_eq!(sig.name, "Jane Doe");
        assert_eq!(sig.company, None);
        assert_eq!(sig.overall_comment.as_deref(), Some("Looks great"));
    }

    #[test]
    fn test_all_approved_finalizes_approved() {
        let mut batch = open_batch(BatchStatus::Approved);
        let now = chrono::Utc::now();
        let approval =
            finalize(&batch, [Approved, Approved, Approved], signature("Jane Doe"), now).unwrap();
        assert_eq!(approval.status(), BatchStatus::Approved);

        approval.apply_to(&mut batch);
        assert!(batch.is_finalized());
        assert_eq!(batch.approved_by_name.as_deref(), Some("Jane Doe"));
        assert_eq!(batch.approved_at, Some(now));
        assert_eq!(batch.version, 5);
    }

    #[test]
    fn test_any_rejection_finalizes_rejected() {
        let batch = open_batch(BatchStatus::Rejected);
        let approval = finalize(
            &batch,
            [Approved, Rejected, Approved],
            signature("Jane Doe"),
            chrono::Utc::now(),
        )
        .unwrap();
        assert_eq!(approval.status(), BatchStatus::Rejected);
        assert_eq!(approval.rollup.rejected_count, 1);
    }

    #[test]
    fn test_pending_items_block_submission() {
        let batch = open_batch(BatchStatus::Partial);
        let result = finalize(
            &batch,
            [Approved, Pending, Approved],
            signature("Jane Doe"),
            chrono::Utc::now(),
        );
        assert_matches!(result, Err(CoreError::ReviewIncomplete { pending: 1 }));
    }

    #[test]
    fn test_empty_batch_cannot_be_submitted() {
        let batch = open_batch(BatchStatus::Pending);
        let result = finalize(&batch, Vec::<ItemStatus>::new(), signature("Jane Doe"), chrono::Utc::now());
        assert_matches!(result, Err(CoreError::ReviewIncomplete { pending: 0 }));
    }

    #[test]
    fn test_stale_cached_status_is_ignored() {
        // Cached rollup says approved, but an item was rejected since.
        let batch = open_batch(BatchStatus::Approved);
        let approval = finalize(
            &batch,
            [Approved, Approved, Rejected],
            signature("Jane Doe"),
            chrono::Utc::now(),
        )
        .unwrap();
        assert_eq!(approval.status(), BatchStatus::Rejected);
    }

    #[test]
    fn test_finalized_batch_cannot_be_resubmitted() {
        let mut batch = open_batch(BatchStatus::Approved);
        batch.approved_at = Some(chrono::Utc::now());
        let result = finalize(&batch, [Approved], signature("Jane Doe"), chrono::Utc::now());
        assert_matches!(result, Err(CoreError::BatchFinalized));
    }
}
