//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (used in print links)
//! - `ADMIN_USERNAME` - Operator login name
//! - `ADMIN_PASSWORD` - Operator password
//! - `ADMIN_TOKEN_SECRET` - Token signing secret (min 32 chars, high entropy)
//! - `WHATSAPP_NUMBER` - Number receiving orders, international format
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_DATABASE_URL` / `DATABASE_URL` - `PostgreSQL` for the admin
//!   flag; without it the flag lives in memory
//! - `ADMIN_TOKEN_TTL_SECS` - Admin token lifetime (default: 43200)
//! - `BUSINESS_NAME` - Header of messages and tickets (default: LA COMANDA)
//! - `DELIVERY_FEE_NEIGHBORHOOD` - Fee when a neighborhood is given (default: 3000)
//! - `DELIVERY_FEE_BASE` - Fee without neighborhood (default: 2500)
//! - `ORDERING_HOURS` - e.g. `thu,fri,sat,sun 20:30-23:49` (default: always open)
//! - `ORDERING_UTC_OFFSET_HOURS` - Timezone of `ORDERING_HOURS` (default: -3)
//! - `STATUS_RATE_LIMIT` - Status reads per window per client (default: 20)
//! - `LOGIN_RATE_LIMIT` - Failed logins per window per client (default: 5)
//! - `RATE_LIMIT_WINDOW_SECS` - Rate limit window (default: 60)
//! - `PRINT_REFERENCE_TTL_SECS` - Lifetime of short print links (default: 86400)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;
use la_comanda_core::{DeliveryFees, OrderingSchedule, Price};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` connection URL; `None` keeps the admin flag in memory
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront, without trailing slash
    pub base_url: String,
    /// Operator credentials and token settings
    pub admin: AdminConfig,
    /// Business identity and pricing
    pub business: BusinessConfig,
    /// Rate limits for public endpoints
    pub rate_limits: RateLimitConfig,
    /// Lifetime of short print references
    pub print_reference_ttl: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Operator credentials.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct AdminConfig {
    pub username: SecretString,
    pub password: SecretString,
    /// HMAC key for admin tokens
    pub token_secret: SecretString,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("token_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Business identity, delivery pricing and ordering hours.
#[derive(Debug, Clone)]
pub struct BusinessConfig {
    pub name: String,
    pub whatsapp_number: String,
    pub delivery_fees: DeliveryFees,
    pub ordering_hours: Option<OrderingSchedule>,
    pub utc_offset: FixedOffset,
}

/// Fixed-window rate limits.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub status_reads: u32,
    pub login_failures: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            status_reads: 20,
            login_failures: 5,
            window: Duration::from_secs(60),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("STOREFRONT_DATABASE_URL");
        let host = get_parsed_or_default::<IpAddr>("STOREFRONT_HOST", "127.0.0.1")?;
        let port = get_parsed_or_default::<u16>("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let admin = AdminConfig::from_env()?;
        let business = BusinessConfig::from_env()?;
        let rate_limits = RateLimitConfig::from_env()?;
        let print_reference_ttl = Duration::from_secs(get_parsed_or_default::<u64>(
            "PRINT_REFERENCE_TTL_SECS",
            "86400",
        )?);

        Ok(Self {
            database_url,
            host,
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            admin,
            business,
            rate_limits,
            print_reference_ttl,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let token_secret = get_validated_secret("ADMIN_TOKEN_SECRET")?;
        validate_secret_length(&token_secret, "ADMIN_TOKEN_SECRET")?;

        Ok(Self {
            username: get_required_secret("ADMIN_USERNAME")?,
            password: get_required_secret("ADMIN_PASSWORD")?,
            token_secret,
            token_ttl: Duration::from_secs(get_parsed_or_default::<u64>(
                "ADMIN_TOKEN_TTL_SECS",
                "43200",
            )?),
        })
    }
}

impl BusinessConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let delivery_fees = DeliveryFees {
            with_neighborhood: Price::new(get_parsed_or_default::<u64>(
                "DELIVERY_FEE_NEIGHBORHOOD",
                "3000",
            )?),
            base: Price::new(get_parsed_or_default::<u64>("DELIVERY_FEE_BASE", "2500")?),
        };

        let ordering_hours = get_optional_env("ORDERING_HOURS")
            .map(|value| {
                value.parse::<OrderingSchedule>().map_err(|e| {
                    ConfigError::InvalidEnvVar("ORDERING_HOURS".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let utc_offset =
            utc_offset_from_hours(get_parsed_or_default::<i32>("ORDERING_UTC_OFFSET_HOURS", "-3")?)?;

        Ok(Self {
            name: get_env_or_default("BUSINESS_NAME", "LA COMANDA"),
            whatsapp_number: get_required_env("WHATSAPP_NUMBER")?,
            delivery_fees,
            ordering_hours,
            utc_offset,
        })
    }
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            status_reads: get_parsed_or_default::<u32>("STATUS_RATE_LIMIT", "20")?,
            login_failures: get_parsed_or_default::<u32>("LOGIN_RATE_LIMIT", "5")?,
            window: Duration::from_secs(get_parsed_or_default::<u64>(
                "RATE_LIMIT_WINDOW_SECS",
                "60",
            )?),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Fixed offset for a whole number of hours east of UTC.
fn utc_offset_from_hours(hours: i32) -> Result<FixedOffset, ConfigError> {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "ORDERING_UTC_OFFSET_HOURS".to_string(),
                format!("{hours} is out of range"),
            )
        })
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to a default string.
fn get_parsed_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
