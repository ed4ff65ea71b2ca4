//! Route definitions for staff batch management.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::artwork_admin;
use crate::state::AppState;

/// Admin routes, nested under `/admin/artwork-batches`.
///
/// ```text
/// GET    /                           list_batches
/// POST   /                           create_batch
/// GET    /{id}                       get_batch
/// POST   /{id}/items                 add_items
/// DELETE /{id}/items/{item_id}       remove_item
/// PUT    /{id}/password              set_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(artwork_admin::list_batches).post(artwork_admin::create_batch),
        )
        .route("/{id}", get(artwork_admin::get_batch))
        .route("/{id}/items", post(artwork_admin::add_items))
        .route("/{id}/items/{item_id}", delete(artwork_admin::remove_item))
        .route("/{id}/password", put(artwork_admin::set_password))
}
