//! Row types for the `artwork_batches` and `artwork_batch_items` tables.
//!
//! Status columns are stored as text and parsed into the core enums when a
//! row is converted into a domain record.

use proofdesk_core::artwork::checklist::Checklist;
use proofdesk_core::artwork::model::{AiAnalysis, ArtworkBatch, ArtworkBatchItem};
use proofdesk_core::artwork::status::{ApprovalType, BatchStatus, ItemStatus};
use proofdesk_core::error::CoreError;
use proofdesk_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `artwork_batches` table.
#[derive(Debug, Clone, FromRow)]
pub struct ArtworkBatchRow {
    pub id: DbId,
    pub batch_name: String,
    pub password_hash: String,
    pub status: String,
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
    pub password_version: i32,
    pub created_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ArtworkBatchRow> for ArtworkBatch {
    type Error = CoreError;

    fn try_from(row: ArtworkBatchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            batch_name: row.batch_name,
            password_hash: row.password_hash,
            status: BatchStatus::parse(&row.status).map_err(corrupt_row)?,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            overall_comment: row.overall_comment,
            approved_by_name: row.approved_by_name,
            approved_by_company: row.approved_by_company,
            approved_at: row.approved_at,
            total_items: row.total_items,
            approved_count: row.approved_count,
            rejected_count: row.rejected_count,
            version: row.version,
            password_version: row.password_version,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A row from the `artwork_batch_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ArtworkBatchItemRow {
    pub id: DbId,
    pub batch_id: DbId,
    pub name: String,
    pub file_url: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub source_link: Option<String>,
    pub ai_analysis: Option<Json<AiAnalysis>>,
    pub status: String,
    pub approval_type: Option<String>,
    pub customer_comment: Option<String>,
    pub checklist: Json<Checklist>,
    pub position: i32,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ArtworkBatchItemRow> for ArtworkBatchItem {
    type Error = CoreError;

    fn try_from(row: ArtworkBatchItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            batch_id: row.batch_id,
            name: row.name,
            file_url: row.file_url,
            file_type: row.file_type,
            file_size: row.file_size,
            source_link: row.source_link,
            ai_analysis: row.ai_analysis.map(|Json(analysis)| analysis),
            status: ItemStatus::parse(&row.status).map_err(corrupt_row)?,
            approval_type: row
                .approval_type
                .as_deref()
                .map(ApprovalType::parse)
                .transpose()
                .map_err(corrupt_row)?,
            customer_comment: row.customer_comment,
            checklist: row.checklist.0,
            position: row.position,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// A stored value the CHECK constraints should have rejected.
fn corrupt_row(err: CoreError) -> CoreError {
    CoreError::Internal(format!("Corrupt artwork row: {err}"))
}

/// Convert a list of rows, failing on the first corrupt one.
pub fn into_domain<R, T>(rows: Vec<R>) -> Result<Vec<T>, CoreError>
where
    T: TryFrom<R, Error = CoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
