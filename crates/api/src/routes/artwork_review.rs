//! Route definitions for the customer review workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::artwork_review;
use crate::state::AppState;

/// Customer routes, nested under `/artwork-review`.
///
/// ```text
/// GET    /{batch_id}                             get_batch_summary
/// POST   /{batch_id}/unlock                      unlock_batch
/// GET    /{batch_id}/items                       get_batch_items
/// POST   /{batch_id}/items/{item_id}/review      review_item
/// POST   /{batch_id}/submit                      submit_batch
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{batch_id}", get(artwork_review::get_batch_summary))
        .route("/{batch_id}/unlock", post(artwork_review::unlock_batch))
        .route("/{batch_id}/items", get(artwork_review::get_batch_items))
        .route(
            "/{batch_id}/items/{item_id}/review",
            post(artwork_review::review_item),
        )
        .route("/{batch_id}/submit", post(artwork_review::submit_batch))
}
