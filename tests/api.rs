//! Router-level tests for the to-do API.
//!
//! These drive the real axum router over an in-memory store, so the full
//! request/response contract is exercised without a database.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use pretty_assertions::assert_eq;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use todo_api::api::{create_router, AppState};
use todo_api::store::{InMemoryItemStore, MemoryStoreConfig};

fn app() -> Router {
    let state = AppState::new(Arc::new(InMemoryItemStore::new()));
    create_router(state, CorsLayer::permissive())
}

fn unavailable_app() -> Router {
    let store = InMemoryItemStore::with_config(MemoryStoreConfig {
        unavailable: true,
        ..Default::default()
    });
    let state = AppState::new(Arc::new(store));
    create_router(state, CorsLayer::permissive())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put(uri: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_returns_liveness_string() {
    let response = app().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"TodoList API works...");
}

#[tokio::test]
async fn list_on_empty_store_returns_empty_array() {
    let response = app().oneshot(get("/items")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn create_returns_201_with_body_and_location() {
    let response = app()
        .oneshot(post_json("/", r#"{"Name": "Buy milk"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/items/1"
    );
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"id": 1, "name": "Buy milk", "isComplete": false})
    );
}

#[tokio::test]
async fn create_ignores_caller_completion_flag() {
    let response = app()
        .oneshot(post_json("/", r#"{"Name": "Buy milk", "isComplete": true}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["isComplete"], serde_json::json!(false));
}

#[tokio::test]
async fn create_without_name_returns_400() {
    let response = app()
        .oneshot(post_json("/", r#"{"isComplete": false}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_invalid_json_returns_400() {
    let response = app().oneshot(post_json("/", "{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_after_create_shows_incomplete() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post_json("/", r#"{"Name": "Buy milk"}"#))
        .await
        .unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    let response = app.oneshot(get(&format!("/items/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["isComplete"],
        serde_json::json!(false)
    );
}

#[tokio::test]
async fn put_completion_flows_through_to_get() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post_json("/", r#"{"Name": "Buy milk"}"#))
        .await
        .unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(put(&format!("/items/{id}?isComplete=true")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await["isComplete"],
        serde_json::json!(true)
    );

    // Idempotent when the same value is set twice.
    let response = app
        .clone()
        .oneshot(put(&format!("/items/{id}?isComplete=true")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // And flips back.
    let response = app
        .clone()
        .oneshot(put(&format!("/items/{id}?isComplete=false")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&format!("/items/{id}"))).await.unwrap();
    assert_eq!(
        body_json(response).await["isComplete"],
        serde_json::json!(false)
    );
}

#[tokio::test]
async fn put_without_query_returns_400() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post_json("/", r#"{"Name": "Buy milk"}"#))
        .await
        .unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    let response = app.oneshot(put(&format!("/items/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_on_unknown_id_returns_404() {
    let response = app()
        .oneshot(put("/items/999999?isComplete=true"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let app = app();

    let created = app
        .clone()
        .oneshot(post_json("/", r#"{"Name": "Buy milk"}"#))
        .await
        .unwrap();
    let id = body_json(created).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(delete(&format!("/items/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&format!("/items/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_on_unknown_id_returns_404() {
    let response = app().oneshot(delete("/items/999999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_are_not_reused_after_delete() {
    let app = app();

    let first = app
        .clone()
        .oneshot(post_json("/", r#"{"Name": "Buy milk"}"#))
        .await
        .unwrap();
    let first_id = body_json(first).await["id"].as_i64().unwrap();

    app.clone()
        .oneshot(delete(&format!("/items/{first_id}")))
        .await
        .unwrap();

    let second = app
        .oneshot(post_json("/", r#"{"Name": "Buy milk again"}"#))
        .await
        .unwrap();
    let second_id = body_json(second).await["id"].as_i64().unwrap();

    assert_ne!(second_id, first_id);
}

#[tokio::test]
async fn list_reflects_creates_in_insertion_order() {
    let app = app();

    for name in ["first", "second"] {
        app.clone()
            .oneshot(post_json("/", &format!(r#"{{"Name": "{name}"}}"#)))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/items")).await.unwrap();
    let body = body_json(response).await;

    assert_eq!(body[0]["name"], serde_json::json!("first"));
    assert_eq!(body[1]["name"], serde_json::json!("second"));
}

#[tokio::test]
async fn unavailable_store_surfaces_as_500() {
    let response = unavailable_app().oneshot(get("/items")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["message"].is_string());
}
