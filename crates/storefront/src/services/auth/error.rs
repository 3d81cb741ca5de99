//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No token was presented on a protected write.
    #[error("missing token")]
    MissingToken,

    /// Token is malformed or its signature does not match.
    #[error("invalid token")]
    InvalidToken,

    /// Token signature is valid but its lifetime is over.
    #[error("token expired")]
    ExpiredToken,

    /// Signing key could not be used.
    #[error("token signing failed: {0}")]
    Signing(String),
}
