use crate::artwork::checklist::ChecklistKey;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The candidate batch password did not match.
    #[error("Incorrect password")]
    AuthFailed,

    #[error("Validation failed: {0}")]
    Validation(String),

    /// An approval was attempted with unchecked checklist items.
    #[error("Checklist incomplete: {}", format_keys(.missing))]
    ChecklistIncomplete { missing: Vec<ChecklistKey> },

    /// A `not_approved` decision was attempted without a comment.
    #[error("A comment is required when an artwork is not approved")]
    CommentRequired,

    /// Final submission was attempted while items are still pending.
    #[error("Review incomplete: {pending} item(s) still pending")]
    ReviewIncomplete { pending: i32 },

    /// The batch already carries a final approval record.
    #[error("Batch has already been submitted")]
    BatchFinalized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The backing store failed; the caller may resubmit the same request.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_keys(keys: &[ChecklistKey]) -> String {
    keys.iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
