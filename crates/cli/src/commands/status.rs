//! Ordering flag commands.
//!
//! # Usage
//!
//! ```bash
//! # Read the flag
//! lc-cli status
//!
//! # Log in and print a token
//! lc-cli login -u operador -p '...'
//!
//! # Pause ordering
//! lc-cli set --enabled false --token "$ADMIN_TOKEN"
//!
//! # Follow the flag, polling every 10 seconds
//! lc-cli watch --interval 10
//! ```

use std::time::Duration;

use la_comanda_core::{AdminStatus, Observation, StatusTracker, StatusView};
use secrecy::SecretString;

use crate::client::{ClientError, StorefrontClient};

/// Print the current flag.
///
/// # Errors
///
/// Returns `ClientError` if the storefront cannot be reached.
pub async fn show(client: &StorefrontClient) -> Result<(), ClientError> {
    let status = client.status().await?;
    print_status(&status);
    Ok(())
}

/// Log in and print the token.
///
/// # Errors
///
/// Returns `ClientError` for wrong credentials or rate limiting.
pub async fn login(
    client: &StorefrontClient,
    username: &str,
    password: &SecretString,
) -> Result<(), ClientError> {
    let response = client.login(username, password).await?;
    tracing::info!(expires_at = %response.expires_at, "Logged in");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", response.token);
    }
    Ok(())
}

/// Write the flag and print the value the server stored.
///
/// # Errors
///
/// Returns `ClientError` for a bad token or a failed write.
pub async fn set(
    client: &StorefrontClient,
    ordering_enabled: bool,
    token: &SecretString,
) -> Result<(), ClientError> {
    let status = client.set_status(ordering_enabled, token).await?;
    if status.ordering_enabled != ordering_enabled {
        tracing::warn!(
            requested = ordering_enabled,
            stored = status.ordering_enabled,
            "Server stored a different value than requested"
        );
    }
    print_status(&status);
    Ok(())
}

/// Poll the flag and log every transition.
///
/// Failed reads are logged and leave the tracked state untouched; responses
/// older than one already applied are discarded. Stops after `polls` reads
/// when given, otherwise runs until Ctrl+C.
pub async fn watch(client: &StorefrontClient, interval: Duration, polls: Option<u64>) {
    let mut tracker = StatusTracker::new();
    let mut ticker = tokio::time::interval(interval);
    let mut done = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                return;
            }
        }

        match client.status().await {
            Ok(status) => {
                apply(&mut tracker, &status);
            }
            Err(e) => tracing::warn!(error = %e, view = ?tracker.view(), "Status read failed"),
        }

        done += 1;
        if polls.is_some_and(|limit| done >= limit) {
            return;
        }
    }
}

/// Feed one poll response into the tracker and log the outcome.
fn apply(tracker: &mut StatusTracker, status: &AdminStatus) -> Observation {
    let observation = tracker.observe(status);
    match observation {
        Observation::Applied { changed: true } => {
            tracing::info!(
                view = ?tracker.view(),
                version = status.version,
                "Ordering flag changed"
            );
        }
        Observation::Applied { changed: false } => {
            tracing::debug!(version = status.version, "Ordering flag unchanged");
        }
        Observation::Stale => {
            tracing::debug!(
                version = status.version,
                epoch = status.epoch,
                seen_version = ?tracker.version(),
                seen_epoch = ?tracker.epoch(),
                "Discarded stale status"
            );
        }
    }
    observation
}

fn print_status(status: &AdminStatus) {
    let label = match StatusView::from_enabled(status.ordering_enabled) {
        StatusView::Enabled => "abierto",
        StatusView::Disabled | StatusView::Unknown => "pausado",
    };

    #[allow(clippy::print_stdout)]
    {
        println!("pedidos: {label} (version {})", status.version);
        if let Some(updated_at) = status.updated_at {
            println!("actualizado: {updated_at}");
        }
    }
}
