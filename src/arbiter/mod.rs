//! The arbitration engine.
//!
//! An [`Arbiter`] owns an injected [`Store`] and the fixed guard rules. It is
//! the imperative shell around the pure core: it loads snapshots, runs the
//! guards, and drives every accepted transition through one optimistic
//! read-guard-commit loop.
//!
//! # Example
//!
//! ```rust
//! # tokio_test_block_on(async {
//! use std::sync::Arc;
//! use hauler_arbiter::arbiter::Arbiter;
//! use hauler_arbiter::config::ArbiterConfig;
//! use hauler_arbiter::core::HaulerStatus;
//! use hauler_arbiter::records::{HaulerProjection, Intent};
//! use hauler_arbiter::store::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! store.put_hauler(HaulerProjection::new("HT-1")).unwrap();
//! let arbiter = Arbiter::new(store, ArbiterConfig::default());
//!
//! let outcome = arbiter
//!     .handle_intent(&Intent::new("HT-1", "START_SHIFT", HaulerStatus::Queuing))
//!     .await
//!     .unwrap();
//! assert!(outcome.success);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

mod error;
mod intent;
mod telemetry;

pub use error::ArbiterError;
pub use telemetry::TelemetryOutcome;

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ArbiterConfig;
use crate::core::{EventHistory, PendingTransition, TransitionEvent};
use crate::enforcement::GuardRules;
use crate::records::{Cycle, CycleId, HaulerId, HaulerProjection, LiveFields, Loader};
use crate::store::{self, CommitOutcome, Store, TransitionCommit};

/// Sole authority over hauler status.
pub struct Arbiter {
    store: Arc<dyn Store>,
    rules: GuardRules,
    config: ArbiterConfig,
}

impl Arbiter {
    /// Create an arbiter with the standard guards configured from `config`.
    pub fn new(store: Arc<dyn Store>, config: ArbiterConfig) -> Self {
        let rules = GuardRules::standard(config.guard_limits());
        Self {
            store,
            rules,
            config,
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn rules(&self) -> &GuardRules {
        &self.rules
    }

    /// Ordered event history of one hauler.
    pub async fn history(&self, hauler_id: &HaulerId) -> Result<EventHistory, ArbiterError> {
        let events = self
            .bounded("events_for_hauler", self.store.events_for_hauler(hauler_id))
            .await?;
        Ok(EventHistory::from_events(events))
    }

    /// Run a storage call under the configured timeout.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = store::Result<T>>,
    ) -> store::Result<T> {
        store::with_timeout(self.config.storage_timeout(), operation, call).await
    }

    async fn load_hauler(&self, hauler_id: &HaulerId) -> Result<HaulerProjection, ArbiterError> {
        self.bounded("get_hauler", self.store.get_hauler(hauler_id))
            .await?
            .ok_or_else(|| ArbiterError::NotFound {
                hauler_id: hauler_id.clone(),
            })
    }

    /// Load the cycle and its loader. Without a loader on the cycle, the
    /// hauler's assigned loader is used.
    async fn load_cycle_context(
        &self,
        cycle_id: Option<&CycleId>,
        hauler: &HaulerProjection,
    ) -> Result<(Option<Cycle>, Option<Loader>), ArbiterError> {
        let cycle = match cycle_id {
            Some(id) => self.bounded("get_cycle", self.store.get_cycle(id)).await?,
            None => None,
        };

        let loader_id = cycle
            .as_ref()
            .and_then(|c| c.loader_id.as_ref())
            .or(hauler.assigned_loader_id.as_ref());
        let loader = match loader_id {
            Some(id) => self.bounded("get_loader", self.store.get_loader(id)).await?,
            None => None,
        };

        Ok((cycle, loader))
    }

    /// Optimistic read-guard-commit loop shared by manual and automatic paths.
    ///
    /// `plan` sees the current projection and returns the transition to apply,
    /// `None` to apply nothing, or an error to stop. The first attempt uses
    /// `snapshot`; every retry re-reads the projection and re-plans. `live`
    /// fields are committed together with the event.
    async fn commit_with_retry<F>(
        &self,
        snapshot: HaulerProjection,
        live: Option<LiveFields>,
        mut plan: F,
    ) -> Result<Option<TransitionEvent>, ArbiterError>
    where
        F: FnMut(&HaulerProjection) -> Result<Option<PendingTransition>, ArbiterError> + Send,
    {
        let hauler_id = snapshot.id.clone();
        let attempts = self.config.max_commit_attempts;
        let mut hauler = snapshot;

        for attempt in 1..=attempts {
            if attempt > 1 {
                hauler = self.load_hauler(&hauler_id).await?;
            }

            let Some(pending) = plan(&hauler)? else {
                return Ok(None);
            };

            let expected_sequence = hauler.sequence;
            let event = pending.into_event(expected_sequence, Utc::now());
            let commit = TransitionCommit {
                expected_sequence,
                event: event.clone(),
                live,
            };

            match self
                .bounded("commit_transition", self.store.commit_transition(commit))
                .await?
            {
                CommitOutcome::Committed(_) => {
                    info!(
                        hauler_id = %hauler_id,
                        from = %event.from_status,
                        to = %event.to_status,
                        sequence = event.sequence,
                        cause = %event.cause,
                        automatic = event.automatic,
                        "transition committed"
                    );
                    return Ok(Some(event));
                }
                CommitOutcome::Duplicate(event_id) => {
                    let existing = self
                        .bounded("get_event", self.store.get_event(&event_id))
                        .await?;
                    if existing.is_some_and(|stored| stored.same_transition(&event)) {
                        info!(hauler_id = %hauler_id, event_id = %event_id, "transition already applied");
                        return Err(ArbiterError::DuplicateEvent { event_id });
                    }
                    // Same key, different change: the slot belongs to another transition.
                    debug!(
                        hauler_id = %hauler_id,
                        attempt,
                        event_id = %event_id,
                        "dedup key taken by a different transition, retrying"
                    );
                }
                CommitOutcome::SequenceConflict { actual } => {
                    debug!(
                        hauler_id = %hauler_id,
                        attempt,
                        expected = expected_sequence,
                        actual,
                        "sequence moved, retrying"
                    );
                }
                CommitOutcome::HaulerMissing => {
                    return Err(ArbiterError::NotFound { hauler_id });
                }
            }
        }

        warn!(hauler_id = %hauler_id, attempts, "commit retry budget exhausted");
        Err(ArbiterError::Conflict {
            hauler_id,
            attempts,
        })
    }
}
