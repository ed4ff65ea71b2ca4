//! JWT-based staff authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use proofdesk_core::error::CoreError;

use super::bearer_token;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated staff member extracted from a JWT Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Identity provider subject (from `claims.sub`).
    pub subject: String,
    /// Role name (e.g. `"admin"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            subject: claims.sub,
            role: claims.role,
        })
    }
}
