//! HTTP client for a running storefront.

use std::time::Duration;

use chrono::{DateTime, Utc};
use la_comanda_core::AdminStatus;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors talking to the storefront.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storefront answered with an error status.
    #[error("storefront returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// Error body returned by the storefront.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Successful login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Client for the storefront's admin endpoints.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    /// Create a client for the storefront at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Read the ordering flag.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or an error status.
    pub async fn status(&self) -> Result<AdminStatus, ClientError> {
        let response = self
            .http
            .get(format!("{}/admin-status", self.base_url))
            .send()
            .await?;
        decode(response).await
    }

    /// Log in with operator credentials.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 401 for wrong credentials and 429 when
    /// rate-limited.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ClientError> {
        let response = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&json!({
                "username": username,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;
        decode(response).await
    }

    /// Write the ordering flag and return the stored value.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with 401 for a bad or expired token.
    pub async fn set_status(
        &self,
        ordering_enabled: bool,
        token: &SecretString,
    ) -> Result<AdminStatus, ClientError> {
        let response = self
            .http
            .post(format!("{}/admin-status", self.base_url))
            .bearer_auth(token.expose_secret())
            .json(&json!({ "orderingEnabled": ordering_enabled }))
            .send()
            .await?;
        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}
