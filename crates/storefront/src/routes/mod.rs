//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (status store reachable)
//! GET  /test-connection        - Status store diagnostic
//!
//! # Ordering
//! GET  /catalog                - Product list
//! POST /quote                  - Subtotal, delivery fee and total for a cart
//! POST /orders                 - Validate and format an order
//!
//! # Admin flag
//! GET  /admin-status           - Read the ordering flag (rate-limited)
//! POST /admin-status           - Write the ordering flag (token required)
//! POST /login                  - Exchange credentials for a token (rate-limited)
//!
//! # Print tickets (HTML)
//! GET  /print?data=...         - Ticket from an inline snapshot
//! GET  /print/{reference}      - Ticket from a short reference
//! ```
//!
//! Every route answers `OPTIONS` with 200 and any other unsupported method
//! with a JSON 405.

pub mod admin_status;
pub mod auth;
pub mod catalog;
pub mod diagnostics;
pub mod orders;
pub mod print;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    routing::{MethodRouter, get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", with_defaults(get(diagnostics::health)))
        .route("/health/ready", with_defaults(get(diagnostics::readiness)))
        .route(
            "/test-connection",
            with_defaults(get(diagnostics::test_connection)),
        )
        .route("/catalog", with_defaults(get(catalog::index)))
        .route("/quote", with_defaults(post(orders::quote)))
        .route("/orders", with_defaults(post(orders::create)))
        .route(
            "/admin-status",
            with_defaults(get(admin_status::show).post(admin_status::update)),
        )
        .route("/login", with_defaults(post(auth::login)))
        .route("/print", with_defaults(get(print::inline)))
        .route("/print/{reference}", with_defaults(get(print::by_reference)))
}

/// Add the `OPTIONS` answer and the JSON 405 fallback to a method router.
fn with_defaults(router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    router.options(preflight).fallback(method_not_allowed)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Unwrap a JSON body, turning extractor rejections into the JSON error shape.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
