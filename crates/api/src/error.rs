use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use proofdesk_core::error::CoreError;
use serde_json::json;

/// Message shown to customers when the store could not save their input.
const PERSISTENCE_MESSAGE: &str = "Failed to save. Please try again.";

/// Message shown when a batch password does not match.
const AUTH_FAILED_MESSAGE: &str = "Incorrect password. Please try again.";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `proofdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut extra = serde_json::Map::new();

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::AuthFailed => (
                    StatusCode::UNAUTHORIZED,
                    "AUTH_FAILED",
                    AUTH_FAILED_MESSAGE.to_string(),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ChecklistIncomplete { missing } => {
                    extra.insert("missing".into(), json!(missing));
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "CHECKLIST_INCOMPLETE",
                        "Please confirm every checklist item before approving".to_string(),
                    )
                }
                CoreError::CommentRequired => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "COMMENT_REQUIRED",
                    core.to_string(),
                ),
                CoreError::ReviewIncomplete { pending } => {
                    extra.insert("pending".into(), json!(pending));
                    (StatusCode::CONFLICT, "REVIEW_INCOMPLETE", core.to_string())
                }
                CoreError::BatchFinalized => {
                    (StatusCode::CONFLICT, "BATCH_FINALIZED", core.to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Persistence(msg) => {
                    tracing::error!(error = %msg, "Persistence failure");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "PERSISTENCE_FAILURE",
                        PERSISTENCE_MESSAGE.to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = serde_json::Map::new();
        body.insert("error".into(), json!(message));
        body.insert("code".into(), json!(code));
        body.extend(extra);

        (status, axum::Json(serde_json::Value::Object(body))).into_response()
    }
}
