//! Telemetry retention.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::config::ArbiterConfig;
use crate::store::{self, Store};

/// Delete telemetry older than the retention window, oldest first.
///
/// At most `purge_batch_limit` records go per sweep; call again to drain a
/// larger backlog. Events and intents are never touched.
pub async fn purge_stale_telemetry(
    store: &dyn Store,
    config: &ArbiterConfig,
    now: DateTime<Utc>,
) -> store::Result<usize> {
    let cutoff = now - config.retention();
    let deleted = store::with_timeout(
        config.storage_timeout(),
        "purge_telemetry_before",
        store.purge_telemetry_before(cutoff, config.purge_batch_limit),
    )
    .await?;

    info!(deleted, cutoff = %cutoff, "telemetry retention sweep");
    Ok(deleted)
}
