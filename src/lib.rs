//! academy_api library
//!
//! Backend API for a sports academy: teams, players, events and
//! attendance declarations. Re-exports modules for integration testing
//! and hosts the router assembly shared by the binary and the tests.

use axum::{middleware, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod jobs;
pub mod repository;

mod error;

pub use config::Config;
pub use domain::{DomainError, Session};
pub use error::{AppError, AppResult};

/// Build the application router
///
/// Axum layers run in reverse order of addition: logging first, then
/// auth, then the handler. `/health` stays outside the auth layer.
pub fn build_router(pool: PgPool) -> Router {
    let protected_routes = api::create_router()
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            api::middleware::auth_middleware,
        ))
        .layer(middleware::from_fn(api::middleware::logging_middleware));

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(pool)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
