//! Short references to print snapshots.
//!
//! Inline print links carry the whole encoded snapshot and get long. A short
//! reference maps a 6-character id to a snapshot held in a `moka` cache for a
//! limited time (24 hours by default).

use std::sync::Arc;
use std::time::Duration;

use la_comanda_core::PrintData;
use moka::future::Cache;
use rand::Rng;

/// Length of a generated reference.
pub const REFERENCE_LENGTH: usize = 6;

const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Store of short print references.
#[derive(Clone)]
pub struct PrintReferences {
    cache: Cache<String, Arc<PrintData>>,
}

impl PrintReferences {
    /// Create a store whose entries expire `ttl` after insertion.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Store a snapshot under a fresh reference and return the reference.
    pub async fn insert(&self, data: PrintData) -> String {
        let data = Arc::new(data);
        loop {
            let reference = generate_reference();
            let entry = self
                .cache
                .entry(reference.clone())
                .or_insert_with(async { Arc::clone(&data) })
                .await;
            if entry.is_fresh() {
                tracing::debug!(reference = %reference, "Stored print reference");
                return reference;
            }
            tracing::debug!(reference = %reference, "Print reference collision, retrying");
        }
    }

    /// Look up a snapshot. `None` for unknown or expired references.
    pub async fn get(&self, reference: &str) -> Option<Arc<PrintData>> {
        if !is_reference(reference) {
            return None;
        }
        self.cache.get(reference).await
    }
}

/// Generate a random base-36 reference.
fn generate_reference() -> String {
    let mut rng = rand::rng();
    (0..REFERENCE_LENGTH)
        .filter_map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET.get(idx).copied().map(char::from)
        })
        .collect()
}

fn is_reference(value: &str) -> bool {
    value.len() == REFERENCE_LENGTH && value.bytes().all(|b| CHARSET.contains(&b))
}
