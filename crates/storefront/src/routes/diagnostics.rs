//! Health checks and the status store diagnostic.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the status store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Read the status row and report whether the store answered.
///
/// GET /test-connection
pub async fn test_connection(State(state): State<AppState>) -> Response {
    let store = state.store();
    match store.get().await {
        Ok(status) => Json(json!({
            "connected": true,
            "message": "Conexión exitosa",
            "backend": store.backend(),
            "data": [status],
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Connection test failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "connected": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}
