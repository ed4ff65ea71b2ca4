pub mod artwork_admin;
pub mod artwork_review;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /artwork-review/{batch_id}                              gate summary (public)
/// /artwork-review/{batch_id}/unlock                       unlock (public)
/// /artwork-review/{batch_id}/items                        review page data (session)
/// /artwork-review/{batch_id}/items/{item_id}/review       item decision (session)
/// /artwork-review/{batch_id}/submit                       final submission (session)
///
/// /admin/artwork-batches                                  list, create (admin only)
/// /admin/artwork-batches/{id}                             get with items and rollup
/// /admin/artwork-batches/{id}/items                       add items (POST)
/// /admin/artwork-batches/{id}/password                    replace password (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/artwork-review", artwork_review::router())
        .nest("/admin/artwork-batches", artwork_admin::router())
}
