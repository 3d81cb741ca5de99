//! Operator login.
//!
//! Each attempt reserves a slot in the per-client limit before the
//! credentials are checked. Failed attempts keep their slot, a successful
//! login clears the client's counter, and malformed requests give the slot
//! back. Once the limit is reached, even correct credentials are refused
//! until the window ends.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{ClientKey, Decision};
use crate::routes::json_body;
use crate::services::AuthError;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchange operator credentials for an admin token.
///
/// POST /login
///
/// # Errors
///
/// Returns `AppError::RateLimited` once the client has too many recent
/// failures and `AppError::Auth` for wrong credentials.
#[instrument(skip(state, client, payload), fields(client = %client.as_str()))]
pub async fn login(
    State(state): State<AppState>,
    client: ClientKey,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let limiter = state.login_limiter();

    if let Decision::Limited { retry_after_secs } = limiter.try_attempt(client.as_str()) {
        tracing::warn!("Login refused, too many failed attempts");
        return Err(AppError::RateLimited {
            message: format!("Demasiados intentos. Esperá {retry_after_secs} segundos."),
            retry_after: retry_after_secs,
        });
    }

    let request = match json_body(payload) {
        Ok(request) => request,
        Err(e) => {
            limiter.release(client.as_str());
            return Err(e);
        }
    };

    match state.auth().login(&request.username, &request.password) {
        Ok(issued) => {
            limiter.reset(client.as_str());
            tracing::info!(expires_at = %issued.expires_at, "Operator logged in");
            add_breadcrumb("auth", "Operator logged in", None);
            Ok(Json(LoginResponse {
                success: true,
                token: issued.token,
                expires_at: issued.expires_at,
            }))
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Failed login attempt");
            Err(AuthError::InvalidCredentials.into())
        }
        Err(e) => {
            limiter.release(client.as_str());
            Err(e.into())
        }
    }
}
