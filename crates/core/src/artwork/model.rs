//! Batch and item records plus the inputs used to create them.

use serde::{Deserialize, Serialize};

use crate::artwork::checklist::Checklist;
use crate::artwork::rollup::BatchRollup;
use crate::artwork::status::{ApprovalType, BatchStatus, ItemStatus};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length for a batch name.
pub const MAX_BATCH_NAME_LENGTH: usize = 200;

/// Maximum length for an item display name.
pub const MAX_ITEM_NAME_LENGTH: usize = 500;

/* --------------------------------------------------------------------------
Records
-------------------------------------------------------------------------- */

/// A named set of artwork proofs sent to one customer for approval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtworkBatch {
    pub id: DbId,
    pub batch_name: String,
    /// Argon2id PHC string. Never sent to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: BatchStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub overall_comment: Option<String>,
    pub approved_by_name: Option<String>,
    pub approved_by_company: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub total_items: i32,
    pub approved_count: i32,
    pub rejected_count: i32,
    pub version: i32,
    /// Bumped on every password replacement. Review sessions carry the
    /// generation they were issued under.
    #[serde(skip_serializing)]
    pub password_version: i32,
    pub created_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ArtworkBatch {
    /// A batch is finalized once a final approval record exists.
    pub fn is_finalized(&self) -> bool {
        self.approved_at.is_some()
    }

    /// Overwrite the cached rollup columns with a fresh derivation.
    pub fn apply_rollup(&mut self, rollup: &BatchRollup) {
        self.total_items = rollup.total;
        self.approved_count = rollup.approved_count;
        self.rejected_count = rollup.rejected_count;
        self.status = rollup.status;
    }

    /// Whether the cached rollup columns agree with `rollup`.
    pub fn matches_rollup(&self, rollup: &BatchRollup) -> bool {
        self.total_items == rollup.total
            && self.approved_count == rollup.approved_count
            && self.rejected_count == rollup.rejected_count
            && self.status == rollup.status
    }
}

/// Informational analysis attached to an item. Never gates a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub category: Option<String>,
    pub colors: Vec<String>,
    pub content_detected: Vec<String>,
    pub quality_score: Option<String>,
    pub analyzed_at: Option<String>,
}

/// One artwork file within a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtworkBatchItem {
    pub id: DbId,
    pub batch_id: DbId,
    pub name: String,
    pub file_url: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub source_link: Option<String>,
    pub ai_analysis: Option<AiAnalysis>,
    pub status: ItemStatus,
    pub approval_type: Option<ApprovalType>,
    pub customer_comment: Option<String>,
    pub checklist: Checklist,
    pub position: i32,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// What the password gate shows before the batch is unlocked.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub id: DbId,
    pub batch_name: String,
    pub finalized: bool,
}

impl From<&ArtworkBatch> for BatchSummary {
    fn from(batch: &ArtworkBatch) -> Self {
        Self {
            id: batch.id,
            batch_name: batch.batch_name.clone(),
            finalized: batch.is_finalized(),
        }
    }
}

/* --------------------------------------------------------------------------
Inputs
-------------------------------------------------------------------------- */

/// Input for creating a batch. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewBatch {
    pub batch_name: String,
    pub password_hash: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub created_by: Option<String>,
}

/// Input for adding one artwork file to a batch.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBatchItem {
    pub name: String,
    pub file_url: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub source_link: Option<String>,
    pub ai_analysis: Option<AiAnalysis>,
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate and trim a batch name.
pub fn validate_batch_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Batch name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_BATCH_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Batch name must be at most {MAX_BATCH_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an optional customer email with a shape check (`local@domain.tld`).
pub fn validate_customer_email(email: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        return Ok(None);
    };
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(CoreError::Validation(format!(
            "Invalid customer email '{email}'"
        )));
    }
    Ok(Some(email.to_string()))
}

/// Validate an item before insertion.
pub fn validate_new_item(item: &NewBatchItem) -> Result<(), CoreError> {
    let name = item.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Item name must not be empty".into()));
    }
    if name.chars().count() > MAX_ITEM_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Item name must be at most {MAX_ITEM_NAME_LENGTH} characters"
        )));
    }
    let url = item.file_url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CoreError::Validation(format!(
            "Item '{name}' must reference an http(s) file URL"
        )));
    }
    if item.file_size.is_some_and(|size| size < 0) {
        return Err(CoreError::Validation(format!(
            "Item '{name}' has a negative file size"
        )));
    }
    Ok(())
}
