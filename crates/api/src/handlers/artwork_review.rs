//! Handlers for the customer-facing artwork review workflow.
//!
//! The gate summary and unlock endpoints are public. Everything else
//! requires a [`ReviewSession`] issued for the batch in the path.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use proofdesk_core::artwork::checklist::ProofTerms;
use proofdesk_core::artwork::model::{ArtworkBatch, ArtworkBatchItem, BatchSummary};
use proofdesk_core::artwork::review::ItemReviewInput;
use proofdesk_core::artwork::rollup::BatchRollup;
use proofdesk_core::artwork::store::ReviewOutcome;
use proofdesk_core::artwork::submission::SubmissionInput;
use proofdesk_core::artwork::workflow;
use proofdesk_core::error::CoreError;
use proofdesk_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::issue_review_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::review_session::ReviewSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for the unlock endpoint.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

/// Response body for a successful unlock.
#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub batch: BatchSummary,
}

/// Everything the review page renders.
#[derive(Debug, Serialize)]
pub struct BatchReviewResponse {
    pub batch: ArtworkBatch,
    pub items: Vec<ArtworkBatchItem>,
    pub rollup: BatchRollup,
    pub terms: ProofTerms,
}

/// GET /api/v1/artwork-review/{batch_id}
///
/// Public gate summary: batch name and whether it has been submitted.
pub async fn get_batch_summary(
    State(state): State<AppState>,
    Path(batch_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BatchSummary>>> {
    let summary = workflow::batch_summary(state.store.as_ref(), batch_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/artwork-review/{batch_id}/unlock
///
/// Check the batch password and issue a review session token.
pub async fn unlock_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<DbId>,
    Json(input): Json<UnlockRequest>,
) -> AppResult<Json<DataResponse<UnlockResponse>>> {
    let batch = state
        .store
        .find_batch(batch_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ArtworkBatch",
            id: batch_id,
        })?;

    // Passwords are stored trimmed; pasted input often carries stray spaces.
    let candidate = input.password.trim();
    let password_valid = !candidate.is_empty()
        && verify_password(candidate, &batch.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::warn!(batch_id = %batch_id, "Batch unlock failed: incorrect password");
        return Err(CoreError::AuthFailed.into());
    }

    let session = issue_review_token(batch_id, batch.password_version, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(
        batch_id = %batch_id,
        session_id = %session.session_id,
        "Batch unlocked"
    );

    Ok(Json(DataResponse {
        data: UnlockResponse {
            token: session.token,
            session_id: session.session_id,
            expires_at: session.expires_at,
            batch: BatchSummary::from(&batch),
        },
    }))
}

/// GET /api/v1/artwork-review/{batch_id}/items
///
/// Batch, items in display order, the derived rollup and the proof terms.
pub async fn get_batch_items(
    ReviewSession(ctx): ReviewSession,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BatchReviewResponse>>> {
    let view = workflow::load_batch(state.store.as_ref(), ctx.batch_id).await?;
    Ok(Json(DataResponse {
        data: BatchReviewResponse {
            batch: view.batch,
            items: view.items,
            rollup: view.rollup,
            terms: ProofTerms::current(),
        },
    }))
}

/// POST /api/v1/artwork-review/{batch_id}/items/{item_id}/review
///
/// Commit the customer's decision on one item.
pub async fn review_item(
    ReviewSession(ctx): ReviewSession,
    State(state): State<AppState>,
    Path((_batch_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<ItemReviewInput>,
) -> AppResult<Json<DataResponse<ReviewOutcome>>> {
    let outcome = workflow::review_item(state.store.as_ref(), &ctx, item_id, input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/artwork-review/{batch_id}/submit
///
/// Sign off the batch once every item has a decision.
pub async fn submit_batch(
    ReviewSession(ctx): ReviewSession,
    State(state): State<AppState>,
    Json(input): Json<SubmissionInput>,
) -> AppResult<Json<DataResponse<ArtworkBatch>>> {
    let batch = workflow::submit_batch(state.store.as_ref(), &ctx, input).await?;
    Ok(Json(DataResponse { data: batch }))
}
