#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use proofdesk_api::app::build_router;
use proofdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use proofdesk_api::auth::password::hash_password;
use proofdesk_api::config::ServerConfig;
use proofdesk_api::state::AppState;
use proofdesk_core::artwork::memory::MemoryArtworkStore;
use proofdesk_core::artwork::model::{ArtworkBatch, ArtworkBatchItem, NewBatchItem};
use proofdesk_core::artwork::store::ArtworkStore;
use proofdesk_core::artwork::workflow::{self, CreateBatchInput};
use tower::ServiceExt;

pub const TEST_BATCH_PASSWORD: &str = "proof-91";

/// Build a test `JwtConfig` with a known secret.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
        review_session_expiry_mins: 120,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_max_connections: 5,
        database_acquire_timeout_secs: 5,
        jwt: test_jwt_config(),
    }
}

/// Build the full application router over the given store.
///
/// Uses the same middleware stack as `main.rs`.
pub fn build_test_app(store: Arc<dyn ArtworkStore>) -> Router {
    build_router(AppState {
        store,
        config: Arc::new(test_config()),
    })
}

/// A staff token carrying `role`.
pub fn staff_token(role: &str) -> String {
    generate_access_token("staff-1", role, &test_jwt_config()).unwrap()
}

pub fn admin_token() -> String {
    staff_token("admin")
}

pub fn new_item(name: &str) -> NewBatchItem {
    NewBatchItem {
        name: name.to_string(),
        file_url: format!("https://cdn.example.com/{name}.png"),
        file_type: Some("image/png".to_string()),
        file_size: Some(4096),
        source_link: None,
        ai_analysis: None,
    }
}

/// Seed a batch protected by [`TEST_BATCH_PASSWORD`] with `item_count` items.
pub async fn seed_batch(
    store: &MemoryArtworkStore,
    item_count: usize,
) -> (ArtworkBatch, Vec<ArtworkBatchItem>) {
    let batch = workflow::create_batch(
        store,
        CreateBatchInput {
            batch_name: "91".to_string(),
            password_hash: hash_password(TEST_BATCH_PASSWORD).unwrap(),
            customer_name: Some("Jane Doe".to_string()),
            customer_email: None,
            created_by: Some("staff-1".to_string()),
        },
    )
    .await
    .unwrap();

    let items = if item_count == 0 {
        Vec::new()
    } else {
        let inputs = (0..item_count)
            .map(|i| new_item(&format!("artwork-{i}")))
            .collect();
        workflow::add_items(store, batch.id, inputs).await.unwrap()
    };
    (batch, items)
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body, None)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body, Some(token))).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
