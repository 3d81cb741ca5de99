//! Persistence for the ordering flag.
//!
//! The flag is a single row. Every write bumps `version` so pollers can tell
//! a fresh answer from a late one. The row's `epoch` is fixed when the row is
//! created; the in-memory store takes a new, larger epoch each time one is
//! built, since its versions restart at zero.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use la_comanda_core::AdminStatus;
use sqlx::PgPool;

use super::StoreError;

/// Backing store for [`AdminStatus`].
#[derive(Debug, Clone)]
pub enum StatusStore {
    /// `admin_settings` table in `PostgreSQL`.
    Postgres(PgPool),
    /// Process-local cell. Used when no database is configured and in tests.
    Memory(Arc<Mutex<AdminStatus>>),
}

impl StatusStore {
    /// In-memory store starting enabled at version 0 in a fresh epoch.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(AdminStatus {
            epoch: next_memory_epoch(),
            ..AdminStatus::default()
        })))
    }

    /// Human-readable backend name for diagnostics.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Read the current status. A missing row reads as the default.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the query fails.
    pub async fn get(&self) -> Result<AdminStatus, StoreError> {
        match self {
            Self::Postgres(pool) => {
                let row = sqlx::query_as::<_, AdminStatus>(
                    r"
                    SELECT ordering_enabled, version, epoch, updated_at
                    FROM admin_settings
                    WHERE id = 1
                    ",
                )
                .fetch_optional(pool)
                .await?;
                Ok(row.unwrap_or_default())
            }
            Self::Memory(cell) => Ok(*cell.lock().unwrap_or_else(PoisonError::into_inner)),
        }
    }

    /// Store a new value and return the stored status with its bumped version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the upsert fails.
    pub async fn set(&self, ordering_enabled: bool) -> Result<AdminStatus, StoreError> {
        match self {
            Self::Postgres(pool) => {
                let row = sqlx::query_as::<_, AdminStatus>(
                    r"
                    INSERT INTO admin_settings (id, ordering_enabled, version, updated_at)
                    VALUES (1, $1, 1, NOW())
                    ON CONFLICT (id) DO UPDATE
                    SET ordering_enabled = EXCLUDED.ordering_enabled,
                        version = admin_settings.version + 1,
                        updated_at = NOW()
                    RETURNING ordering_enabled, version, epoch, updated_at
                    ",
                )
                .bind(ordering_enabled)
                .fetch_one(pool)
                .await?;
                Ok(row)
            }
            Self::Memory(cell) => {
                let mut status = cell.lock().unwrap_or_else(PoisonError::into_inner);
                status.ordering_enabled = ordering_enabled;
                status.version += 1;
                status.updated_at = Some(Utc::now());
                Ok(*status)
            }
        }
    }

    /// Check that the backend answers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database is unreachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query("SELECT 1").fetch_one(pool).await?;
                Ok(())
            }
            Self::Memory(_) => Ok(()),
        }
    }
}

/// Epoch for a new in-memory store: the current time in milliseconds, kept
/// strictly increasing within the process.
fn next_memory_epoch() -> i64 {
    static LAST: AtomicI64 = AtomicI64::new(0);

    let now = Utc::now().timestamp_millis();
    let previous = LAST
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}
