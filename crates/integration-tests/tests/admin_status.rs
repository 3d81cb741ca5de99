//! Ordering flag reads and writes through the HTTP surface.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{StatusCode, header};
use la_comanda_core::{AdminStatus, StatusTracker, StatusView};
use la_comanda_integration_tests::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_fresh_store_reports_ordering_enabled() {
    let ctx = TestContext::new();

    let response = ctx.get("/admin-status").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["orderingEnabled"], true);
    assert_eq!(body["version"], 0);
}

#[tokio::test]
async fn test_login_then_pause_ordering() {
    let ctx = TestContext::new();
    let token = ctx.login_token().await;

    let response = ctx
        .post_json(
            "/admin-status",
            &json!({ "orderingEnabled": false, "token": token }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
    assert_eq!(response.json()["orderingEnabled"], false);

    let read = ctx.get("/admin-status").await.json();
    assert_eq!(read["orderingEnabled"], false);
    assert_eq!(read["version"], 1);
    assert!(read["updatedAt"].is_string());
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let ctx = TestContext::new();
    let token = ctx.login_token().await;

    let response = ctx
        .post_json_bearer("/admin-status", &json!({ "orderingEnabled": false }), &token)
        .await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);

    let response = ctx
        .post_json_bearer("/admin-status", &json!({ "orderingEnabled": true }), &token)
        .await;
    let body = response.json();
    assert_eq!(body["orderingEnabled"], true);
    assert_eq!(body["version"], 2);
}

#[tokio::test]
async fn test_bad_token_leaves_flag_unchanged() {
    let ctx = TestContext::new();

    let forged = ctx
        .post_json(
            "/admin-status",
            &json!({ "orderingEnabled": false, "token": "e30.c2lnbmF0dXJl" }),
        )
        .await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);
    let body = forged.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No autorizado");

    let missing = ctx
        .post_json("/admin-status", &json!({ "orderingEnabled": false }))
        .await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let read = ctx.get("/admin-status").await.json();
    assert_eq!(read["orderingEnabled"], true);
    assert_eq!(read["version"], 0);
}

#[tokio::test]
async fn test_malformed_update_body_is_bad_request() {
    let ctx = TestContext::new();
    let token = ctx.login_token().await;

    let response = ctx
        .post_json_bearer("/admin-status", &json!({ "orderingEnabled": "no" }), &token)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["success"], false);
}

#[tokio::test]
async fn test_status_reads_are_rate_limited_per_client() {
    let ctx = TestContext::new();

    for _ in 0..20 {
        let response = ctx.get_from("/admin-status", "203.0.113.7").await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let limited = ctx.get_from("/admin-status", "203.0.113.7").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        limited.json()["error"],
        "Demasiadas consultas. Esperá un momento."
    );
    let retry_after: u64 = limited.headers[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let other = ctx.get_from("/admin-status", "203.0.113.8").await;
    assert_eq!(other.status, StatusCode::OK);
}

#[tokio::test]
async fn test_poller_follows_storefront_restart() {
    let mut tracker = StatusTracker::new();

    let before = TestContext::new();
    let token = before.login_token().await;
    for enabled in [false, true, false] {
        let echo = before
            .post_json_bearer("/admin-status", &json!({ "orderingEnabled": enabled }), &token)
            .await;
        tracker.observe(&serde_json::from_str::<AdminStatus>(&echo.body).unwrap());
    }
    assert_eq!(tracker.view(), StatusView::Disabled);
    assert_eq!(tracker.version(), Some(3));

    // Same clients, new process: memory store back at version 0
    let after = TestContext::new();
    let read: AdminStatus = serde_json::from_str(&after.get("/admin-status").await.body).unwrap();
    assert_eq!(read.version, 0);
    tracker.observe(&read);

    assert_eq!(tracker.view(), StatusView::Enabled);
}
