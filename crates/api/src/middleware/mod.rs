//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Staff identity from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`review_session::ReviewSession`] -- Customer session bound to the path batch.

pub mod auth;
pub mod rbac;
pub mod review_session;

use axum::http::request::Parts;
use proofdesk_core::error::CoreError;

use crate::error::AppError;

/// Extract the token from an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })
}
