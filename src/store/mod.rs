//! Pluggable document storage for the arbiter.
//!
//! The `Store` trait covers the collections the arbiter touches: hauler
//! projections, cycles and loaders (read-only), the event log, intent
//! outcomes and telemetry retention.
//!
//! ## CAS Semantics
//!
//! [`Store::commit_transition`] is the only way status and sequence change. It
//! appends the event and advances the projection in one all-or-nothing step,
//! and only if the stored sequence still equals the one the caller read. A
//! caller that loses the race gets [`CommitOutcome::SequenceConflict`] and
//! must re-read, re-evaluate guards and try again.

pub mod error;
pub mod memory;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::TransitionEvent;
use crate::records::{
    Cycle, CycleId, EventId, HaulerId, HaulerProjection, IntentId, IntentOutcome, LiveFields,
    Loader, LoaderId,
};

pub use error::StoreError;
pub use memory::InMemoryStore;

/// The result type used by storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// An event together with the projection changes that must land with it.
#[derive(Clone, Debug)]
pub struct TransitionCommit {
    /// Sequence the caller observed; the event must carry `expected_sequence + 1`.
    pub expected_sequence: u64,
    pub event: TransitionEvent,
    /// Telemetry fields to apply in the same step, for automatic transitions.
    pub live: Option<LiveFields>,
}

/// Result of a conditional commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Event written and projection advanced.
    Committed(EventId),
    /// An event with the same dedup key already exists; nothing was written.
    Duplicate(EventId),
    /// The stored sequence moved on since it was read; nothing was written.
    SequenceConflict { actual: u64 },
    /// No projection exists for the hauler.
    HaulerMissing,
}

impl CommitOutcome {
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Bound a storage call. An elapsed deadline becomes [`StoreError::Timeout`].
pub async fn with_timeout<T>(
    after: Duration,
    operation: &'static str,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(after, call)
        .await
        .unwrap_or_else(|_| Err(StoreError::Timeout { operation, after }))
}

/// Storage abstraction for arbitration state.
///
/// Implementations must be `Send + Sync`; handlers for the same hauler may
/// run concurrently.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_hauler(&self, hauler_id: &HaulerId) -> Result<Option<HaulerProjection>>;

    async fn get_cycle(&self, cycle_id: &CycleId) -> Result<Option<Cycle>>;

    async fn get_loader(&self, loader_id: &LoaderId) -> Result<Option<Loader>>;

    /// Atomically append the event and advance status and sequence.
    ///
    /// Dedup key collisions are reported before sequence conflicts so a
    /// replayed transition is recognised as already applied.
    async fn commit_transition(&self, commit: TransitionCommit) -> Result<CommitOutcome>;

    /// Overwrite the live telemetry fields without touching status or sequence.
    ///
    /// Returns `false` when the hauler does not exist.
    async fn update_live_fields(&self, hauler_id: &HaulerId, live: LiveFields) -> Result<bool>;

    /// A single event by id (its dedup key).
    async fn get_event(&self, event_id: &EventId) -> Result<Option<TransitionEvent>>;

    /// All events of a hauler, in sequence order.
    async fn events_for_hauler(&self, hauler_id: &HaulerId) -> Result<Vec<TransitionEvent>>;

    async fn intent_outcome(&self, intent_id: &IntentId) -> Result<Option<IntentOutcome>>;

    /// Mark an intent processed. The first outcome wins.
    ///
    /// Returns `false` when the intent already carried an outcome.
    async fn mark_intent_processed(
        &self,
        intent_id: &IntentId,
        outcome: &IntentOutcome,
    ) -> Result<bool>;

    /// Delete up to `limit` telemetry records created before `cutoff`.
    ///
    /// Returns the number deleted.
    async fn purge_telemetry_before(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize>;
}
