//! Operator authentication.
//!
//! A successful login yields a signed, expiring token of the form
//! `payload.signature`:
//!
//! - `payload` is URL-safe base64 of `{"sid": "<uuid v4>", "exp": <unix seconds>}`
//! - `signature` is URL-safe base64 of HMAC-SHA256 over the encoded payload
//!
//! Every session id is fresh, so two logins never share a token.

mod error;

pub use error::AuthError;

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::config::AdminConfig;

type HmacSha256 = Hmac<Sha256>;

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Per-login session id.
    pub sid: Uuid,
    /// Expiry as unix seconds.
    pub exp: i64,
}

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication service.
///
/// Checks operator credentials and issues and verifies admin tokens.
#[derive(Clone)]
pub struct AuthService {
    username: SecretString,
    password: SecretString,
    secret: SecretString,
    ttl: TimeDelta,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            secret: config.token_secret.clone(),
            ttl: ttl_delta(config.token_ttl),
        }
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Check credentials and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either value differs.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        self.login_at(username, password, Utc::now())
    }

    /// [`AuthService::login`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either value differs.
    pub fn login_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AuthError> {
        // Evaluate both so a wrong username costs the same as a wrong password
        let user_ok = constant_time_compare(self.username.expose_secret(), username);
        let pass_ok = constant_time_compare(self.password.expose_secret(), password);
        if !(user_ok && pass_ok) {
            return Err(AuthError::InvalidCredentials);
        }
        self.issue_at(now)
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Issue a token for a new session expiring `ttl` after `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Signing` if the claims cannot be encoded.
    pub fn issue_at(&self, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let claims = TokenClaims {
            sid: Uuid::new_v4(),
            exp: expires_at.timestamp(),
        };
        let json = serde_json::to_vec(&claims).map_err(|e| AuthError::Signing(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(payload.as_bytes())?);

        Ok(IssuedToken {
            token: format!("{payload}.{signature}"),
            expires_at,
        })
    }

    /// Verify signature and expiry of a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for malformed or forged tokens and
    /// `AuthError::ExpiredToken` once `exp` has passed.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// [`AuthService::verify`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`AuthService::verify`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        let (payload, signature) = token
            .trim()
            .split_once('.')
            .ok_or(AuthError::InvalidToken)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::ExpiredToken);
        }
        Ok(claims)
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = self.mac()?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

fn ttl_delta(ttl: Duration) -> TimeDelta {
    TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&AdminConfig {
            username: SecretString::from("operador"),
            password: SecretString::from("hunter2-but-longer"),
            token_secret: SecretString::from("k9$Qz!2vLr#8Tw@5Xn^7Bm&4Hd*6Jp0Y"),
            token_ttl: Duration::from_secs(3600),
        })
    }

    #[test]
    fn test_login_with_correct_credentials() {
        let auth = service();
        let issued = auth.login("operador", "hunter2-but-longer").unwrap();
        let claims = auth.verify(&issued.token).unwrap();
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_login_is_case_sensitive() {
        let auth = service();
        assert!(matches!(
            auth.login("Operador", "hunter2-but-longer"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("operador", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_tokens_are_unique_per_login() {
        let auth = service();
        let a = auth.login("operador", "hunter2-but-longer").unwrap();
        let b = auth.login("operador", "hunter2-but-longer").unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = service();
        let issued_at = Utc::now() - TimeDelta::hours(2);
        let issued = auth.issue_at(issued_at).unwrap();
        assert!(matches!(
            auth.verify(&issued.token),
            Err(AuthError::ExpiredToken)
        ));
        assert!(auth.verify_at(&issued.token, issued_at).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = service();
        let issued = auth.login("operador", "hunter2-but-longer").unwrap();
        let (_, signature) = issued.token.split_once('.').unwrap();

        let forged_claims = TokenClaims {
            sid: Uuid::new_v4(),
            exp: i64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{forged_payload}.{signature}");

        assert!(matches!(auth.verify(&forged), Err(AuthError::InvalidToken)));
        assert!(matches!(auth.verify("no-dot"), Err(AuthError::InvalidToken)));
        assert!(matches!(auth.verify("a.%%%"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService::new(&AdminConfig {
            username: SecretString::from("operador"),
            password: SecretString::from("hunter2-but-longer"),
            token_secret: SecretString::from("another-key-entirely-32-bytes!!!"),
            token_ttl: Duration::from_secs(3600),
        });
        let issued = other.login("operador", "hunter2-but-longer").unwrap();
        assert!(matches!(
            service().verify(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
