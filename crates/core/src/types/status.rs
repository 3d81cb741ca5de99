//! Admin "ordering enabled" flag and its client-side view.
//!
//! The flag is a single shared cell with last-writer-wins semantics. Each write
//! bumps a monotonic `version`, which lets pollers discard responses that
//! arrive out of order instead of regressing to an older value.
//!
//! `version` only grows within one `epoch`. A store that loses its state (an
//! in-memory store after a restart) starts a new, larger epoch with version
//! zero, so responses compare by `(epoch, version)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The current value of the admin flag as stored by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub ordering_enabled: bool,
    /// Incremented on every accepted write. Zero means "never written".
    #[serde(default)]
    pub version: i64,
    /// Identifies the store lifetime `version` counts within. Zero is the
    /// fallback served when the store could not be read.
    #[serde(default)]
    pub epoch: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for AdminStatus {
    /// Bootstrap value when nothing is stored: ordering is open.
    fn default() -> Self {
        Self {
            ordering_enabled: true,
            version: 0,
            epoch: 0,
            updated_at: None,
        }
    }
}

impl AdminStatus {
    /// Ordering position of this response: later epochs win, then versions.
    #[must_use]
    pub const fn position(&self) -> (i64, i64) {
        (self.epoch, self.version)
    }
}

/// What a client currently believes about the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusView {
    /// No successful read yet.
    #[default]
    Unknown,
    Enabled,
    Disabled,
}

impl StatusView {
    #[must_use]
    pub const fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

/// Result of feeding a server response into a [`StatusTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The response was applied; `changed` tells whether the view moved.
    Applied { changed: bool },
    /// The response is older than one already applied: an earlier epoch, or
    /// a lower version within the same epoch.
    Stale,
}

/// Client-side state machine for the admin flag.
///
/// `Unknown -> Enabled | Disabled`, driven by poll responses and by the
/// server's echo after a write. Failed reads are simply not fed in, which
/// leaves the last known state in place.
///
/// ```
/// use la_comanda_core::{AdminStatus, StatusTracker, StatusView};
///
/// let mut tracker = StatusTracker::new();
/// assert_eq!(tracker.view(), StatusView::Unknown);
///
/// let fresh = AdminStatus { ordering_enabled: false, version: 4, epoch: 7, updated_at: None };
/// let late = AdminStatus { ordering_enabled: true, version: 3, epoch: 7, updated_at: None };
/// tracker.observe(&fresh);
/// tracker.observe(&late);
/// assert_eq!(tracker.view(), StatusView::Disabled);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTracker {
    view: StatusView,
    seen: Option<(i64, i64)>,
}

impl StatusTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view: StatusView::Unknown,
            seen: None,
        }
    }

    #[must_use]
    pub const fn view(&self) -> StatusView {
        self.view
    }

    /// Last applied version, if any response has been applied.
    #[must_use]
    pub const fn version(&self) -> Option<i64> {
        match self.seen {
            Some((_, version)) => Some(version),
            None => None,
        }
    }

    /// Epoch of the last applied response, if any.
    #[must_use]
    pub const fn epoch(&self) -> Option<i64> {
        match self.seen {
            Some((epoch, _)) => Some(epoch),
            None => None,
        }
    }

    /// Whether ordering is enabled, or `None` before the first read.
    #[must_use]
    pub const fn ordering_enabled(&self) -> Option<bool> {
        match self.view {
            StatusView::Unknown => None,
            StatusView::Enabled => Some(true),
            StatusView::Disabled => Some(false),
        }
    }

    /// Apply a server response (poll result or write echo).
    ///
    /// Responses at the same position as the last applied one are accepted,
    /// so repeated polls are idempotent. A newer epoch resets the version
    /// floor; the zero-epoch fallback never overrides a real read.
    pub fn observe(&mut self, status: &AdminStatus) -> Observation {
        let position = status.position();
        if self.seen.is_some_and(|seen| position < seen) {
            return Observation::Stale;
        }

        let next = StatusView::from_enabled(status.ordering_enabled);
        let changed = next != self.view;
        self.view = next;
        self.seen = Some(position);
        Observation::Applied { changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPOCH: i64 = 1_792_000_000_000;

    fn status(enabled: bool, version: i64) -> AdminStatus {
        at_epoch(EPOCH, enabled, version)
    }

    fn at_epoch(epoch: i64, enabled: bool, version: i64) -> AdminStatus {
        AdminStatus {
            ordering_enabled: enabled,
            version,
            epoch,
            updated_at: None,
        }
    }

    #[test]
    fn test_default_is_enabled() {
        assert!(AdminStatus::default().ordering_enabled);
        assert_eq!(AdminStatus::default().version, 0);
    }

    #[test]
    fn test_first_observation_transitions_from_unknown() {
        let mut tracker = StatusTracker::new();
        assert_eq!(tracker.ordering_enabled(), None);
        assert_eq!(
            tracker.observe(&status(true, 0)),
            Observation::Applied { changed: true }
        );
        assert_eq!(tracker.view(), StatusView::Enabled);
    }

    #[test]
    fn test_same_version_is_idempotent() {
        let mut tracker = StatusTracker::new();
        tracker.observe(&status(false, 2));
        assert_eq!(
            tracker.observe(&status(false, 2)),
            Observation::Applied { changed: false }
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut tracker = StatusTracker::new();
        tracker.observe(&status(false, 5));
        assert_eq!(tracker.observe(&status(true, 4)), Observation::Stale);
        assert_eq!(tracker.view(), StatusView::Disabled);
        assert_eq!(tracker.version(), Some(5));
    }

    #[test]
    fn test_newer_write_echo_applies() {
        let mut tracker = StatusTracker::new();
        tracker.observe(&status(true, 1));
        tracker.observe(&status(false, 2));
        assert_eq!(tracker.ordering_enabled(), Some(false));
    }

    #[test]
    fn test_store_restart_resets_version_floor() {
        let mut tracker = StatusTracker::new();
        for version in 1..=3 {
            tracker.observe(&status(version % 2 == 0, version));
        }
        tracker.observe(&status(false, 3));
        assert_eq!(tracker.view(), StatusView::Disabled);

        // Restarted store: later epoch, version back at zero
        let restarted = at_epoch(EPOCH + 60_000, true, 0);
        for _ in 0..3 {
            tracker.observe(&restarted);
        }
        assert_eq!(tracker.view(), StatusView::Enabled);
        assert_eq!(tracker.epoch(), Some(EPOCH + 60_000));
        assert_eq!(tracker.version(), Some(0));

        // A late response from before the restart is discarded
        assert_eq!(tracker.observe(&status(false, 3)), Observation::Stale);
        assert_eq!(tracker.view(), StatusView::Enabled);
    }

    #[test]
    fn test_read_failure_fallback_is_stale() {
        let mut tracker = StatusTracker::new();
        tracker.observe(&status(false, 1));
        assert_eq!(
            tracker.observe(&AdminStatus::default()),
            Observation::Stale
        );
        assert_eq!(tracker.view(), StatusView::Disabled);
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(status(true, 3)).unwrap_or_default();
        assert_eq!(json["orderingEnabled"], true);
        assert_eq!(json["version"], 3);
        assert_eq!(json["epoch"], EPOCH);
        assert!(json.get("updatedAt").is_none());
    }
}
