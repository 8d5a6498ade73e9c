//! In-memory store implementation.
//!
//! [`InMemoryStore`] keeps every collection behind one `RwLock`, so a commit
//! that writes the event log and the projection is atomic with respect to
//! every other reader and writer.
//!
//! ## Limitations
//!
//! - **No durability**: all state is lost when the process exits
//! - **Single-process only**: nothing is shared across process boundaries

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CommitOutcome, Result, Store, StoreError, TransitionCommit};
use crate::core::TransitionEvent;
use crate::records::{
    Cycle, CycleId, EventId, HaulerId, HaulerProjection, IntentId, IntentOutcome, LiveFields,
    Loader, LoaderId, TelemetryId, TelemetryRecord,
};

#[derive(Debug, Default)]
struct Documents {
    haulers: HashMap<HaulerId, HaulerProjection>,
    cycles: HashMap<CycleId, Cycle>,
    loaders: HashMap<LoaderId, Loader>,
    events: BTreeMap<EventId, TransitionEvent>,
    intent_outcomes: HashMap<IntentId, IntentOutcome>,
    telemetry: HashMap<TelemetryId, TelemetryRecord>,
}

/// Thread-safe in-memory [`Store`].
///
/// ## Example
///
/// ```rust
/// use hauler_arbiter::records::HaulerProjection;
/// use hauler_arbiter::store::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// store.put_hauler(HaulerProjection::new("HT-1")).unwrap();
/// assert_eq!(store.event_count().unwrap(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    docs: RwLock<Documents>,
}

fn poison_err<T>(_: PoisonError<T>) -> StoreError {
    StoreError::LockPoisoned
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a hauler projection.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn put_hauler(&self, hauler: HaulerProjection) -> Result<()> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        docs.haulers.insert(hauler.id.clone(), hauler);
        Ok(())
    }

    pub fn put_cycle(&self, cycle: Cycle) -> Result<()> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        docs.cycles.insert(cycle.id.clone(), cycle);
        Ok(())
    }

    pub fn put_loader(&self, loader: Loader) -> Result<()> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        docs.loaders.insert(loader.id.clone(), loader);
        Ok(())
    }

    /// Store a telemetry sample as a client would.
    pub fn insert_telemetry(&self, record: TelemetryRecord) -> Result<()> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        docs.telemetry.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn telemetry_count(&self) -> Result<usize> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.telemetry.len())
    }

    /// Total number of events across all haulers.
    pub fn event_count(&self) -> Result<usize> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.events.len())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_hauler(&self, hauler_id: &HaulerId) -> Result<Option<HaulerProjection>> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.haulers.get(hauler_id).cloned())
    }

    async fn get_cycle(&self, cycle_id: &CycleId) -> Result<Option<Cycle>> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.cycles.get(cycle_id).cloned())
    }

    async fn get_loader(&self, loader_id: &LoaderId) -> Result<Option<Loader>> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.loaders.get(loader_id).cloned())
    }

    async fn commit_transition(&self, commit: TransitionCommit) -> Result<CommitOutcome> {
        let TransitionCommit {
            expected_sequence,
            event,
            live,
        } = commit;

        if event.sequence != expected_sequence + 1 {
            return Err(StoreError::InvalidCommit {
                hauler_id: event.hauler_id.to_string(),
                expected_sequence,
                event_sequence: event.sequence,
            });
        }

        let mut docs = self.docs.write().map_err(poison_err)?;

        if docs.events.contains_key(&event.id) {
            return Ok(CommitOutcome::Duplicate(event.id));
        }

        let Some(hauler) = docs.haulers.get_mut(&event.hauler_id) else {
            return Ok(CommitOutcome::HaulerMissing);
        };

        if hauler.sequence != expected_sequence {
            return Ok(CommitOutcome::SequenceConflict {
                actual: hauler.sequence,
            });
        }

        hauler.status = event.to_status;
        hauler.sequence = event.sequence;
        hauler.last_status_change_at = Some(event.arbitrated_at);
        if let Some(live) = &live {
            hauler.apply_live(live);
        }

        let id = event.id.clone();
        docs.events.insert(id.clone(), event);
        Ok(CommitOutcome::Committed(id))
    }

    async fn update_live_fields(&self, hauler_id: &HaulerId, live: LiveFields) -> Result<bool> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        let Some(hauler) = docs.haulers.get_mut(hauler_id) else {
            return Ok(false);
        };
        hauler.apply_live(&live);
        Ok(true)
    }

    async fn get_event(&self, event_id: &EventId) -> Result<Option<TransitionEvent>> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.events.get(event_id).cloned())
    }

    async fn events_for_hauler(&self, hauler_id: &HaulerId) -> Result<Vec<TransitionEvent>> {
        let docs = self.docs.read().map_err(poison_err)?;
        let mut events: Vec<TransitionEvent> = docs
            .events
            .values()
            .filter(|e| &e.hauler_id == hauler_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    async fn intent_outcome(&self, intent_id: &IntentId) -> Result<Option<IntentOutcome>> {
        let docs = self.docs.read().map_err(poison_err)?;
        Ok(docs.intent_outcomes.get(intent_id).cloned())
    }

    async fn mark_intent_processed(
        &self,
        intent_id: &IntentId,
        outcome: &IntentOutcome,
    ) -> Result<bool> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        if docs.intent_outcomes.contains_key(intent_id) {
            return Ok(false);
        }
        docs.intent_outcomes
            .insert(intent_id.clone(), outcome.clone());
        Ok(true)
    }

    async fn purge_telemetry_before(&self, cutoff: DateTime<Utc>, limit: usize) -> Result<usize> {
        let mut docs = self.docs.write().map_err(poison_err)?;
        let mut stale: Vec<(DateTime<Utc>, TelemetryId)> = docs
            .telemetry
            .values()
            .filter(|t| t.created_at < cutoff)
            .map(|t| (t.created_at, t.id.clone()))
            .collect();
        stale.sort();
        stale.truncate(limit);

        for (_, id) in &stale {
            docs.telemetry.remove(id);
        }
        Ok(stale.len())
    }
}
