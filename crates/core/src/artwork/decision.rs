//! The customer's three-way decision on an artwork item.
//!
//! A rejection must explain itself, so [`Decision::NotApproved`] carries a
//! [`RequiredComment`] that cannot be constructed empty.

use serde::Serialize;

use crate::artwork::status::{ApprovalType, ItemStatus};
use crate::error::CoreError;

/// Maximum length for a customer comment on an item.
pub const MAX_COMMENT_LENGTH: usize = 5_000;

/// A trimmed, non-empty comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredComment(String);

impl RequiredComment {
    /// Build from raw input, failing with [`CoreError::CommentRequired`] when blank.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::CommentRequired);
        }
        validate_comment_length(trimmed)?;
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "approval_type", rename_all = "snake_case")]
pub enum Decision {
    ApproveAsIs { comment: Option<String> },
    ApproveWithChanges { comment: Option<String> },
    NotApproved { comment: RequiredComment },
}

impl Decision {
    /// Build a decision from the wire form (`approval_type` + optional comment).
    pub fn from_parts(
        approval_type: ApprovalType,
        comment: Option<&str>,
    ) -> Result<Self, CoreError> {
        match approval_type {
            ApprovalType::NotApproved => Ok(Decision::NotApproved {
                comment: RequiredComment::new(comment.unwrap_or_default())?,
            }),
            ApprovalType::ApproveAsIs => Ok(Decision::ApproveAsIs {
                comment: optional_comment(comment)?,
            }),
            ApprovalType::ApproveWithChanges => Ok(Decision::ApproveWithChanges {
                comment: optional_comment(comment)?,
            }),
        }
    }

    pub fn approval_type(&self) -> ApprovalType {
        match self {
            Decision::ApproveAsIs { .. } => ApprovalType::ApproveAsIs,
            Decision::ApproveWithChanges { .. } => ApprovalType::ApproveWithChanges,
            Decision::NotApproved { .. } => ApprovalType::NotApproved,
        }
    }

    pub fn status(&self) -> ItemStatus {
        self.approval_type().resulting_status()
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Decision::ApproveAsIs { comment } | Decision::ApproveWithChanges { comment } => {
                comment.as_deref()
            }
            Decision::NotApproved { comment } => Some(comment.as_str()),
        }
    }
}

/// Trim an optional comment; blank input becomes `None`.
fn optional_comment(comment: Option<&str>) -> Result<Option<String>, CoreError> {
    match comment.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => {
            validate_comment_length(c)?;
            Ok(Some(c.to_string()))
        }
        None => Ok(None),
    }
}

fn validate_comment_length(comment: &str) -> Result<(), CoreError> {
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}
