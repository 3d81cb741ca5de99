//! Fixed-window rate limiting keyed by client IP.
//!
//! Counters live in a process-local map behind a `Mutex`; entries older than
//! the window are evicted lazily on the next access. Limits are best-effort
//! and not shared between instances.
//!
//! Two usage patterns:
//! - [`FixedWindowLimiter::hit`]: every request counts (status reads)
//! - [`FixedWindowLimiter::try_attempt`]: reserves a slot under the same lock
//!   that checks the limit. The caller resets the key on success and
//!   releases the slot when the attempt should not count (login)

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

// =============================================================================
// Client Key Extractor for Cloudflare + Fly.io
// =============================================================================

/// Client identity used as the rate limit key.
///
/// Checks Cloudflare's `CF-Connecting-IP` header first, then standard proxy
/// headers, then the socket peer address. Falls back to `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey(pub String);

impl ClientKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = ip_from_headers(&parts.headers)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip())
            })
            .map_or_else(|| "unknown".to_string(), |ip| ip.to_string());
        Ok(Self(key))
    }
}

fn ip_from_headers(headers: &HeaderMap) -> Option<IpAddr> {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    // Try CF-Connecting-IP first (Cloudflare's real client IP)
    header_ip("cf-connecting-ip")
        // Try X-Forwarded-For (first IP in the chain)
        .or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
        .or_else(|| header_ip("x-real-ip"))
        // Fly.io's header
        .or_else(|| header_ip("fly-client-ip"))
}

// =============================================================================
// Fixed Window Limiter
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    first_attempt: Instant,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    /// Rejected; whole seconds until the window resets (rounded up).
    Limited { retry_after_secs: u64 },
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Fixed-window counter per key.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl FixedWindowLimiter {
    /// Allow `limit` counted events per `window` per key.
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request and decide whether it may proceed.
    pub fn hit(&self, key: &str) -> Decision {
        self.hit_at(key, Instant::now())
    }

    /// [`FixedWindowLimiter::hit`] with an explicit clock.
    pub fn hit_at(&self, key: &str, now: Instant) -> Decision {
        let mut entries = self.lock();
        self.evict_expired(&mut entries, now);

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            first_attempt: now,
        });
        entry.count = entry.count.saturating_add(1);

        if entry.count > self.limit {
            Decision::Limited {
                retry_after_secs: self.remaining_secs(entry.first_attempt, now),
            }
        } else {
            Decision::Allowed
        }
    }

    /// Reserve one attempt for `key`, or reject once `limit` are held.
    ///
    /// A rejected attempt does not count.
    pub fn try_attempt(&self, key: &str) -> Decision {
        self.try_attempt_at(key, Instant::now())
    }

    /// [`FixedWindowLimiter::try_attempt`] with an explicit clock.
    pub fn try_attempt_at(&self, key: &str, now: Instant) -> Decision {
        let mut entries = self.lock();
        self.evict_expired(&mut entries, now);

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            first_attempt: now,
        });
        if entry.count >= self.limit {
            return Decision::Limited {
                retry_after_secs: self.remaining_secs(entry.first_attempt, now),
            };
        }
        entry.count += 1;
        Decision::Allowed
    }

    /// Give back an attempt reserved with [`FixedWindowLimiter::try_attempt`].
    pub fn release(&self, key: &str) {
        let mut entries = self.lock();
        if let Some(entry) = entries.get_mut(key) {
            entry.count = entry.count.saturating_sub(1);
            if entry.count == 0 {
                entries.remove(key);
            }
        }
    }

    /// Forget everything recorded for `key`.
    pub fn reset(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RateLimitEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evict_expired(&self, entries: &mut HashMap<String, RateLimitEntry>, now: Instant) {
        entries.retain(|_, entry| now.saturating_duration_since(entry.first_attempt) < self.window);
    }

    fn remaining_secs(&self, first_attempt: Instant, now: Instant) -> u64 {
        let remaining = self
            .window
            .saturating_sub(now.saturating_duration_since(first_attempt));
        let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        secs.max(1)
    }
}
