//! HTTP-level integration tests for staff batch management.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get, get_auth, post_json, post_json_auth,
    put_json_auth, staff_token,
};
use proofdesk_core::artwork::checklist::Checklist;
use proofdesk_core::artwork::memory::MemoryArtworkStore;
use serde_json::json;

fn app() -> axum::Router {
    common::build_test_app(Arc::new(MemoryArtworkStore::new()))
}

async fn create_batch(app: axum::Router, name: &str) -> serde_json::Value {
    let response = post_json_auth(
        app,
        "/api/v1/admin/artwork-batches",
        json!({
            "batch_name": name,
            "password": "proof-91",
            "customer_name": "Jane Doe",
            "customer_email": "jane@brand.com",
        }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

fn items_body(names: &[&str]) -> serde_json::Value {
    let items: Vec<_> = names
        .iter()
        .map(|name| {
            json!({
                "name": name,
                "file_url": format!("https://cdn.example.com/{name}.png"),
                "file_type": "image/png",
                "file_size": 1024,
                "ai_analysis": { "title": "Front panel", "colors": ["#ff0000"] },
            })
        })
        .collect();
    json!({ "items": items })
}

async fn create_batch_with_password(app: axum::Router, password: &str) -> String {
    let response = post_json_auth(
        app,
        "/api/v1/admin/artwork-batches",
        json!({ "batch_name": "91", "password": password }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn add_items(app: axum::Router, id: &str, names: &[&str]) -> Vec<String> {
    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/artwork-batches/{id}/items"),
        items_body(names),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

async fn unlock(app: axum::Router, id: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        &format!("/api/v1/artwork-review/{id}/unlock"),
        json!({ "password": password }),
    )
    .await
}

async fn unlock_token(app: axum::Router, id: &str, password: &str) -> String {
    let response = unlock(app, id, password).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn approve_item(app: axum::Router, id: &str, item_id: &str, token: &str) {
    let response = post_json_auth(
        app,
        &format!("/api/v1/artwork-review/{id}/items/{item_id}/review"),
        json!({
            "approval_type": "approve_as_is",
            "checklist": serde_json::to_value(Checklist::all_checked()).unwrap(),
        }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_endpoints_require_admin_role() {
    let app = app();

    let response = get(app.clone(), "/api/v1/admin/artwork-batches").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(
        app.clone(),
        "/api/v1/admin/artwork-batches",
        &staff_token("viewer"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/admin/artwork-batches", &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_batch_hides_password() {
    let app = app();
    let batch = create_batch(app, " 91 ").await;

    assert_eq!(batch["batch_name"], "91");
    assert_eq!(batch["status"], "pending");
    assert_eq!(batch["total_items"], 0);
    assert_eq!(batch["created_by"], "staff-1");
    assert!(batch.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_batch_validation() {
    let app = app();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/artwork-batches",
        json!({ "batch_name": "91", "password": "abc" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/admin/artwork-batches",
        json!({ "batch_name": "  ", "password": "proof-91" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/admin/artwork-batches",
        json!({ "batch_name": "91", "password": "proof-91", "customer_email": "nope" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_items_and_get_batch() {
    let app = app();
    let batch = create_batch(app.clone(), "91").await;
    let id = batch["id"].as_str().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/admin/artwork-batches/{id}/items"),
        items_body(&["front", "back"]),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["position"], 0);
    assert_eq!(json["data"][1]["position"], 1);
    assert_eq!(json["data"][0]["ai_analysis"]["colors"][0], "#ff0000");

    let response = get_auth(
        app,
        &format!("/api/v1/admin/artwork-batches/{id}"),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["batch"]["total_items"], 2);
    assert_eq!(json["data"]["rollup"]["pending_count"], 2);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_add_items_validation() {
    let app = app();
    let batch = create_batch(app.clone(), "91").await;
    let id = batch["id"].as_str().unwrap();
    let uri = format!("/api/v1/admin/artwork-batches/{id}/items");

    let response = post_json_auth(app.clone(), &uri, json!({ "items": [] }), &admin_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        &uri,
        json!({ "items": [{ "name": "front", "file_url": "file:///tmp/front.png" }] }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_batches_newest_first() {
    let app = app();
    create_batch(app.clone(), "first").await;
    create_batch(app.clone(), "second").await;

    let response = get_auth(app, "/api/v1/admin/artwork-batches", &admin_token()).await;
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["batch_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["second", "first"]);
}

#[tokio::test]
async fn test_replace_password() {
    let app = app();
    let batch = create_batch(app.clone(), "91").await;
    let id = batch["id"].as_str().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/artwork-batches/{id}/password"),
        json!({ "password": "new-secret" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/artwork-review/{id}/unlock"),
        json!({ "password": "proof-91" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        &format!("/api/v1/artwork-review/{id}/unlock"),
        json!({ "password": "new-secret" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_replace_password_unknown_batch() {
    let response = put_json_auth(
        app(),
        &format!("/api/v1/admin/artwork-batches/{}/password", uuid::Uuid::now_v7()),
        json!({ "password": "new-secret" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_batch_password_ignores_surrounding_whitespace() {
    let app = app();
    let id = create_batch_with_password(app.clone(), "proof-91 ").await;

    for candidate in ["proof-91", " proof-91 ", "proof-91 ", "\tproof-91\n"] {
        let response = unlock(app.clone(), &id, candidate).await;
        assert_eq!(response.status(), StatusCode::OK, "candidate {candidate:?}");
    }
    let response = unlock(app.clone(), &id, "proof-9").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/artwork-batches/{id}/password"),
        json!({ "password": "  new-secret  " }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = unlock(app.clone(), &id, "new-secret").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = unlock(app, &id, " new-secret").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_blank_padded_password_is_too_short() {
    let response = post_json_auth(
        app(),
        "/api/v1/admin/artwork-batches",
        json!({ "batch_name": "91", "password": "  ab  " }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_replace_password_revokes_open_sessions() {
    let app = app();
    let id = create_batch_with_password(app.clone(), "proof-91").await;
    let item_ids = add_items(app.clone(), &id, &["front"]).await;
    let old_token = unlock_token(app.clone(), &id, "proof-91").await;

    let items_uri = format!("/api/v1/artwork-review/{id}/items");
    let response = get_auth(app.clone(), &items_uri, &old_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/artwork-batches/{id}/password"),
        json!({ "password": "new-secret" }),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &items_uri, &old_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/artwork-review/{id}/items/{}/review", item_ids[0]),
        json!({
            "approval_type": "approve_as_is",
            "checklist": serde_json::to_value(Checklist::all_checked()).unwrap(),
        }),
        &old_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let new_token = unlock_token(app.clone(), &id, "new-secret").await;
    let response = get_auth(app, &items_uri, &new_token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_remove_item_rederives_rollup() {
    let app = app();
    let id = create_batch_with_password(app.clone(), "proof-91").await;
    let item_ids = add_items(app.clone(), &id, &["front", "back", "sleeve"]).await;
    let token = unlock_token(app.clone(), &id, "proof-91").await;
    approve_item(app.clone(), &id, &item_ids[0], &token).await;
    approve_item(app.clone(), &id, &item_ids[1], &token).await;

    let item_uri = format!("/api/v1/admin/artwork-batches/{id}/items/{}", item_ids[2]);
    let response = delete_auth(app.clone(), &item_uri, &staff_token("designer")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &item_uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "approved");
    assert_eq!(json["data"]["total_items"], 2);
    assert_eq!(json["data"]["approved_count"], 2);

    let response = get_auth(
        app.clone(),
        &format!("/api/v1/admin/artwork-batches/{id}"),
        &admin_token(),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["rollup"]["status"], "approved");

    let response = delete_auth(app, &item_uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remove_item_from_finalized_batch_fails() {
    let app = app();
    let id = create_batch_with_password(app.clone(), "proof-91").await;
    let item_ids = add_items(app.clone(), &id, &["front"]).await;
    let token = unlock_token(app.clone(), &id, "proof-91").await;
    approve_item(app.clone(), &id, &item_ids[0], &token).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/artwork-review/{id}/submit"),
        json!({ "approver_name": "Jane Doe" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(
        app,
        &format!("/api/v1/admin/artwork-batches/{id}/items/{}", item_ids[0]),
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BATCH_FINALIZED");
}
