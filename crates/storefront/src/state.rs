//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::db::StatusStore;
use crate::middleware::FixedWindowLimiter;
use crate::services::{AuthService, PrintReferences};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the status store, services, rate limiters and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: StatusStore,
    auth: AuthService,
    print_refs: PrintReferences,
    status_limiter: FixedWindowLimiter,
    login_limiter: FixedWindowLimiter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `store` - Backing store for the ordering flag
    #[must_use]
    pub fn new(config: StorefrontConfig, store: StatusStore) -> Self {
        let auth = AuthService::new(&config.admin);
        let print_refs = PrintReferences::new(config.print_reference_ttl);
        let limits = config.rate_limits;

        Self {
            inner: Arc::new(AppStateInner {
                status_limiter: FixedWindowLimiter::new(limits.status_reads, limits.window),
                login_limiter: FixedWindowLimiter::new(limits.login_failures, limits.window),
                config,
                store,
                auth,
                print_refs,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the status store.
    #[must_use]
    pub fn store(&self) -> &StatusStore {
        &self.inner.store
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the short print reference store.
    #[must_use]
    pub fn print_refs(&self) -> &PrintReferences {
        &self.inner.print_refs
    }

    /// Limiter for `GET /admin-status`.
    #[must_use]
    pub fn status_limiter(&self) -> &FixedWindowLimiter {
        &self.inner.status_limiter
    }

    /// Limiter for failed `POST /login` attempts.
    #[must_use]
    pub fn login_limiter(&self) -> &FixedWindowLimiter {
        &self.inner.login_limiter
    }
}
