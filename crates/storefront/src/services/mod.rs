//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Operator login and signed admin tokens
//! - `print_refs` - Short references to print snapshots

pub mod auth;
pub mod print_refs;

pub use auth::{AuthError, AuthService};
pub use print_refs::PrintReferences;
