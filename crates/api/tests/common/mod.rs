//! Shared harness for the API integration tests.
//!
//! The app is built over an in-memory store, so no database is needed.
//! Requests go straight into the router through `tower::ServiceExt`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use recipebox_api::auth::jwt::{generate_access_token, JwtConfig};
use recipebox_api::config::ServerConfig;
use recipebox_api::router::build_app_router;
use recipebox_api::state::AppState;
use recipebox_core::memory::MemoryStore;
use recipebox_core::recipe::{NewRecipe, Recipe};
use tower::ServiceExt;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CAROL: i64 = 3;

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "recipebox-api-test-secret".to_string(),
        access_token_expiry_mins: 15,
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://cdn.test".to_string(),
        max_upload_bytes: 1024 * 1024,
        jwt: jwt_config(),
    }
}

/// A store with three registered users and no content.
pub async fn test_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.add_user(ALICE, "Alice", Some("http://cdn.test/images/alice.png")).await;
    store.add_user(BOB, "Bob", None).await;
    store.add_user(CAROL, "Carol", None).await;
    store
}

pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_app_router(AppState::new(store, test_config())).unwrap()
}

pub fn token(user_id: i64) -> String {
    generate_access_token(user_id, "user", &jwt_config()).unwrap()
}

pub fn admin_token(user_id: i64) -> String {
    generate_access_token(user_id, "admin", &jwt_config()).unwrap()
}

pub fn new_recipe(title: &str, ingredients: &str) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        ingredients: ingredients.to_string(),
        preparation: "Mix and bake".to_string(),
        about: "A family favourite".to_string(),
        photo_url: None,
    }
}

/// Seed a recipe created `minutes_ago` minutes in the past.
pub async fn seed_recipe(
    store: &MemoryStore,
    owner_id: i64,
    title: &str,
    ingredients: &str,
    minutes_ago: i64,
) -> Recipe {
    store
        .seed_recipe(
            owner_id,
            &new_recipe(title, ingredients),
            Utc::now() - Duration::minutes(minutes_ago),
        )
        .await
}

fn authorized(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = authorized(Request::builder().method(method).uri(uri), token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, "POST", uri, token, body).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, "PUT", uri, token, body).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let request = authorized(Request::delete(uri), token)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a single-part multipart body with the file under `field`.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: Option<&str>,
    field: &str,
    file_name: &str,
    data: &[u8],
) -> Response<Body> {
    let boundary = "recipebox-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = authorized(Request::post(uri), token)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
