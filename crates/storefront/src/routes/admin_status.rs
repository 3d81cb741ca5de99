//! Ordering flag endpoints.
//!
//! Reads are public but rate-limited. A read that cannot reach the store
//! answers with the default status (ordering enabled, version 0, epoch 0),
//! which pollers that already hold a real read treat as stale. Writes need
//! a valid admin token and echo the stored value.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, header},
};
use la_comanda_core::AdminStatus;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ClientKey, Decision};
use crate::routes::json_body;
use crate::services::AuthError;
use crate::state::AppState;

const TOO_MANY_READS: &str = "Demasiadas consultas. Esperá un momento.";

/// Body of `POST /admin-status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub ordering_enabled: bool,
    /// Token may come here or as `Authorization: Bearer`.
    #[serde(default)]
    pub token: Option<String>,
}

/// Read the ordering flag.
///
/// GET /admin-status
///
/// # Errors
///
/// Returns `AppError::RateLimited` after too many reads from one client.
#[instrument(skip(state, client), fields(client = %client.as_str()))]
pub async fn show(State(state): State<AppState>, client: ClientKey) -> Result<Json<AdminStatus>> {
    if let Decision::Limited { retry_after_secs } = state.status_limiter().hit(client.as_str()) {
        return Err(AppError::RateLimited {
            message: TOO_MANY_READS.to_string(),
            retry_after: retry_after_secs,
        });
    }

    let status = match state.store().get().await {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "Status read failed, serving default");
            AdminStatus::default()
        }
    };

    Ok(Json(status))
}

/// Write the ordering flag.
///
/// POST /admin-status
///
/// # Errors
///
/// Returns `AppError::Auth` for a missing, forged or expired token and
/// `AppError::Store` if the write fails.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<AdminStatus>> {
    let request = json_body(payload)?;

    let token = request
        .token
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| bearer_token(&headers))
        .ok_or(AuthError::MissingToken)?;
    let claims = state.auth().verify(token)?;

    let status = state.store().set(request.ordering_enabled).await?;

    tracing::info!(
        session = %claims.sid,
        ordering_enabled = status.ordering_enabled,
        version = status.version,
        "Ordering flag updated"
    );
    add_breadcrumb(
        "admin",
        "Ordering flag updated",
        Some(&[(
            "ordering_enabled",
            if status.ordering_enabled { "true" } else { "false" },
        )]),
    );

    Ok(Json(status))
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_update_request_token_optional() {
        let request: UpdateStatusRequest =
            serde_json::from_str(r#"{"orderingEnabled": false}"#).unwrap();
        assert!(!request.ordering_enabled);
        assert!(request.token.is_none());
    }
}
