//! Customer review session extractor.
//!
//! Validates the review token issued by the unlock endpoint, checks that it
//! was issued for the batch named in the request path, and rejects sessions
//! opened before the batch password was last replaced.

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use proofdesk_core::artwork::review::ReviewContext;
use proofdesk_core::error::CoreError;
use uuid::Uuid;

use super::bearer_token;
use crate::auth::jwt::validate_review_token;
use crate::error::AppError;
use crate::state::AppState;

/// Path parameter that names the batch a customer route acts on.
const BATCH_PARAM: &str = "batch_id";

/// A validated review session scoped to the path batch.
#[derive(Debug, Clone, Copy)]
pub struct ReviewSession(pub ReviewContext);

impl FromRequestParts<AppState> for ReviewSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_review_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired review session".into(),
            ))
        })?;

        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::InternalError(format!("Path params unavailable: {e}")))?;
        let path_batch = params
            .iter()
            .find(|(name, _)| *name == BATCH_PARAM)
            .and_then(|(_, value)| Uuid::parse_str(value).ok());

        if path_batch != Some(claims.sub) {
            tracing::warn!(
                token_batch_id = %claims.sub,
                session_id = %claims.sid,
                "Review session used outside its batch"
            );
            return Err(AppError::Core(CoreError::Forbidden(
                "Review session is not valid for this batch".into(),
            )));
        }

        let batch = state
            .store
            .find_batch(claims.sub)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ArtworkBatch",
                id: claims.sub,
            })?;
        if batch.password_version != claims.pwv {
            tracing::info!(
                batch_id = %claims.sub,
                session_id = %claims.sid,
                "Review session revoked by password change"
            );
            return Err(AppError::Core(CoreError::Unauthorized(
                "Review session has been revoked; unlock the batch again".into(),
            )));
        }

        Ok(ReviewSession(ReviewContext {
            batch_id: claims.sub,
            session_id: claims.sid,
        }))
    }
}
