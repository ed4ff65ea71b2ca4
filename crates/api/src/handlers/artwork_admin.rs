//! Staff handlers for creating and stocking artwork batches.
//!
//! All endpoints require the `admin` role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use proofdesk_core::artwork::model::{ArtworkBatch, NewBatchItem};
use proofdesk_core::artwork::workflow::{self, BatchView, CreateBatchInput};
use proofdesk_core::error::CoreError;
use proofdesk_core::types::DbId;
use serde::Deserialize;

use crate::auth::password::{hash_password, validate_password_strength, MIN_BATCH_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for creating a batch.
#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    pub batch_name: String,
    pub password: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

/// Request body for adding items to a batch.
#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<NewBatchItem>,
}

/// Request body for replacing a batch password.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// Trim, validate and hash a batch password.
fn hash_batch_password(password: &str) -> AppResult<String> {
    let password = password.trim();
    validate_password_strength(password, MIN_BATCH_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// POST /api/v1/admin/artwork-batches
pub async fn create_batch(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBatchRequest>,
) -> AppResult<impl IntoResponse> {
    let password_hash = hash_batch_password(&input.password)?;

    let batch = workflow::create_batch(
        state.store.as_ref(),
        CreateBatchInput {
            batch_name: input.batch_name,
            password_hash,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            created_by: Some(admin.subject),
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: batch })))
}

/// GET /api/v1/admin/artwork-batches
pub async fn list_batches(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ArtworkBatch>>>> {
    let batches = state.store.list_batches().await?;
    Ok(Json(DataResponse { data: batches }))
}

/// GET /api/v1/admin/artwork-batches/{id}
pub async fn get_batch(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(batch_id): Path<DbId>,
) -> AppResult<Json<DataResponse<BatchView>>> {
    let view = workflow::load_batch(state.store.as_ref(), batch_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/admin/artwork-batches/{id}/items
pub async fn add_items(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(batch_id): Path<DbId>,
    Json(input): Json<AddItemsRequest>,
) -> AppResult<impl IntoResponse> {
    let items = workflow::add_items(state.store.as_ref(), batch_id, input.items).await?;

    tracing::debug!(batch_id = %batch_id, added_by = %admin.subject, "Items added by staff");

    Ok((StatusCode::CREATED, Json(DataResponse { data: items })))
}

/// DELETE /api/v1/admin/artwork-batches/{id}/items/{item_id}
///
/// Returns the batch with its re-derived rollup.
pub async fn remove_item(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((batch_id, item_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<ArtworkBatch>>> {
    let batch = workflow::remove_item(state.store.as_ref(), batch_id, item_id).await?;

    tracing::debug!(
        batch_id = %batch_id,
        item_id = %item_id,
        removed_by = %admin.subject,
        "Item removed by staff"
    );

    Ok(Json(DataResponse { data: batch }))
}

/// PUT /api/v1/admin/artwork-batches/{id}/password
///
/// Open review sessions on the batch stop being accepted.
pub async fn set_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(batch_id): Path<DbId>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<StatusCode> {
    let password_hash = hash_batch_password(&input.password)?;

    let updated = state
        .store
        .set_password_hash(batch_id, &password_hash)
        .await?;
    if !updated {
        return Err(CoreError::NotFound {
            entity: "ArtworkBatch",
            id: batch_id,
        }
        .into());
    }

    tracing::info!(batch_id = %batch_id, changed_by = %admin.subject, "Batch password replaced");
    Ok(StatusCode::NO_CONTENT)
}
