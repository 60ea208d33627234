//! Tests for the root-level `/health` endpoint and the shared middleware.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, get, test_store};
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_ok() {
    let app = build_test_app(test_store().await);

    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn request_id_is_generated() {
    let app = build_test_app(test_store().await);

    let response = get(app, "/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = build_test_app(test_store().await);
    let request = Request::get("/health")
        .header("x-request-id", "recipebox-trace-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], "recipebox-trace-1");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(test_store().await);
    let response = get(app, "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
