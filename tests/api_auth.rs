//! API authentication tests
//!
//! In-process router tests over a lazy pool: these paths never touch the
//! database, so they run without one. The health endpoint bypasses auth;
//! everything under /api/v1 rejects requests before any query when the
//! bearer token is missing or malformed.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use academy_api::build_router;

mod common;

fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy("postgres://localhost/academy_test_unused")
        .expect("lazy pool")
}

#[tokio::test]
async fn health_check_requires_no_auth() {
    let app = build_router(lazy_pool());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let app = build_router(lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/teams")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error_code"], "unauthenticated");
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let app = build_router(lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/events")
                .header("Authorization", "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn empty_bearer_token_is_401() {
    let app = build_router(lazy_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/players")
                .header("Authorization", "Bearer ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
