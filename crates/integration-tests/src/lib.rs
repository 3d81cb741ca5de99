//! Integration tests for La Comanda.
//!
//! Tests drive the full storefront `Router` in-process with
//! `tower::ServiceExt::oneshot`, backed by the in-memory status store. No
//! database or running server is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p la-comanda-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `admin_status` - Ordering flag reads, writes and token checks
//! - `login` - Login gate and its rate limit
//! - `orders` - Quotes, order submission and print tickets
//! - `routing` - `OPTIONS`, 405 and health endpoints

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::FixedOffset;
use la_comanda_core::DeliveryFees;
use la_comanda_storefront::config::{
    AdminConfig, BusinessConfig, RateLimitConfig, StorefrontConfig,
};
use la_comanda_storefront::db::StatusStore;
use la_comanda_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "operador";
pub const ADMIN_PASSWORD: &str = "Milanesa-Napolitana-77";
pub const BASE_URL: &str = "http://comanda.test";
pub const WHATSAPP_NUMBER: &str = "5493772406996";

/// Storefront configuration suitable for tests.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: None,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: BASE_URL.to_string(),
        admin: AdminConfig {
            username: SecretString::from(ADMIN_USERNAME),
            password: SecretString::from(ADMIN_PASSWORD),
            token_secret: SecretString::from("Zq8#Lw2!Rt6@Yp4$Vn1%Kc9^Hs3&Jd7*"),
            token_ttl: Duration::from_secs(3600),
        },
        business: BusinessConfig {
            name: "LA COMANDA".to_string(),
            whatsapp_number: WHATSAPP_NUMBER.to_string(),
            delivery_fees: DeliveryFees::default(),
            ordering_hours: None,
            utc_offset: FixedOffset::west_opt(3 * 3600).expect("valid offset"),
        },
        rate_limits: RateLimitConfig::default(),
        print_reference_ttl: Duration::from_secs(3600),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Body parsed as JSON. Panics on invalid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("invalid JSON body ({e}): {}", self.body))
    }
}

/// In-process storefront.
#[derive(Clone)]
pub struct TestContext {
    pub state: AppState,
    app: Router,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Storefront with the test configuration and a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Storefront with a custom configuration.
    #[must_use]
    pub fn with_config(config: StorefrontConfig) -> Self {
        let state = AppState::new(config, StatusStore::memory());
        let app = la_comanda_storefront::app(state.clone());
        Self { state, app }
    }

    /// Send a request and collect the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// `GET path` from the given client IP.
    pub async fn get_from(&self, path: &str, client_ip: &str) -> TestResponse {
        self.send(request(Method::GET, path, client_ip, None, None))
            .await
    }

    /// `GET path` from a default client IP.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_from(path, "198.51.100.1").await
    }

    /// `POST path` with a JSON body from the given client IP.
    pub async fn post_json_from(&self, path: &str, body: &Value, client_ip: &str) -> TestResponse {
        self.send(request(Method::POST, path, client_ip, Some(body), None))
            .await
    }

    /// `POST path` with a JSON body from a default client IP.
    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        self.post_json_from(path, body, "198.51.100.1").await
    }

    /// `POST path` with a JSON body and a bearer token.
    pub async fn post_json_bearer(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        self.send(request(
            Method::POST,
            path,
            "198.51.100.1",
            Some(body),
            Some(token),
        ))
        .await
    }

    /// Log in with the test credentials and return the token.
    pub async fn login_token(&self) -> String {
        let response = self
            .post_json(
                "/login",
                &serde_json::json!({
                    "username": ADMIN_USERNAME,
                    "password": ADMIN_PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.json()["token"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| panic!("no token in {}", response.body))
    }
}

/// Build a request with the client IP in `x-forwarded-for`.
#[must_use]
pub fn request(
    method: Method,
    path: &str,
    client_ip: &str,
    json: Option<&Value>,
    bearer: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header("x-forwarded-for", client_ip);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match json {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder
        .body(body)
        .unwrap_or_else(|e| panic!("invalid request: {e}"))
}
