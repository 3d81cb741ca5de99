//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (permissive, answers preflight)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//!
//! Rate limiting is applied inside the handlers that need it, since login only
//! counts failed attempts.

pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{ClientKey, Decision, FixedWindowLimiter};
pub use request_id::request_id_middleware;
