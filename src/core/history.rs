//! Transition events and per-hauler event history.
//!
//! Every accepted status change, manual or automatic, becomes one immutable
//! `TransitionEvent`. Events of a hauler form a gap-free run of sequence
//! numbers starting at 1, and each event is keyed by a dedup key derived from
//! `(hauler, cycle, sequence, cause)` so a replayed arbitration collides
//! instead of applying twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::state::HaulerStatus;
use crate::records::{CycleId, EventId, HaulerId};

/// Placeholder for the cycle slot of a dedup key when no cycle is referenced.
const NO_CYCLE: &str = "none";

/// Deterministic dedup key, also used as the event id.
///
/// # Example
///
/// ```rust
/// use hauler_arbiter::core::dedup_key;
/// use hauler_arbiter::records::{CycleId, HaulerId};
///
/// let key = dedup_key(&HaulerId::new("HT-4"), Some(&CycleId::new("C-9")), 12, "BODY_UP");
/// assert_eq!(key.as_str(), "HT-4_C-9_12_BODY_UP");
/// ```
pub fn dedup_key(
    hauler_id: &HaulerId,
    cycle_id: Option<&CycleId>,
    sequence: u64,
    cause: &str,
) -> EventId {
    let cycle = cycle_id.map_or(NO_CYCLE, CycleId::as_str);
    EventId::new(format!("{hauler_id}_{cycle}_{sequence}_{cause}"))
}

/// One applied status change: a `hauler_events/{eventId}` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEvent {
    /// Equal to the dedup key.
    pub id: EventId,
    pub hauler_id: HaulerId,
    #[serde(default)]
    pub cycle_id: Option<CycleId>,
    pub from_status: HaulerStatus,
    pub to_status: HaulerStatus,
    /// Intent type for manual transitions, trigger name for automatic ones.
    pub cause: String,
    pub device_time: DateTime<Utc>,
    pub arbitrated_at: DateTime<Utc>,
    pub sequence: u64,
    pub automatic: bool,
}

impl TransitionEvent {
    /// True when `other` records the same status change, ignoring timestamps.
    ///
    /// A dedup key collision only means "already applied" if this holds; the
    /// key does not include the target status.
    pub fn same_transition(&self, other: &TransitionEvent) -> bool {
        self.hauler_id == other.hauler_id
            && self.sequence == other.sequence
            && self.from_status == other.from_status
            && self.to_status == other.to_status
            && self.automatic == other.automatic
    }
}

/// Inputs for a new event; the sequence and key are derived when the event is built.
#[derive(Clone, Debug)]
pub struct PendingTransition {
    pub hauler_id: HaulerId,
    pub cycle_id: Option<CycleId>,
    pub from_status: HaulerStatus,
    pub to_status: HaulerStatus,
    pub cause: String,
    pub device_time: DateTime<Utc>,
    pub automatic: bool,
}

impl PendingTransition {
    /// Build the event that follows `current_sequence`.
    pub fn into_event(self, current_sequence: u64, arbitrated_at: DateTime<Utc>) -> TransitionEvent {
        let sequence = current_sequence + 1;
        let id = dedup_key(&self.hauler_id, self.cycle_id.as_ref(), sequence, &self.cause);
        TransitionEvent {
            id,
            hauler_id: self.hauler_id,
            cycle_id: self.cycle_id,
            from_status: self.from_status,
            to_status: self.to_status,
            cause: self.cause,
            device_time: self.device_time,
            arbitrated_at,
            sequence,
            automatic: self.automatic,
        }
    }
}

/// Ordered event history of a single hauler.
///
/// History is immutable - `record` returns a new history with the event
/// appended.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventHistory {
    events: Vec<TransitionEvent>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Build a history from stored events in any order.
    pub fn from_events(mut events: Vec<TransitionEvent>) -> Self {
        events.sort_by_key(|e| e.sequence);
        Self { events }
    }

    /// Record an event, returning a new history.
    pub fn record(&self, event: TransitionEvent) -> Self {
        let mut events = self.events.clone();
        events.push(event);
        Self { events }
    }

    /// Statuses traversed: the first event's origin, then each target.
    pub fn get_path(&self) -> Vec<HaulerStatus> {
        let mut path = Vec::with_capacity(self.events.len() + 1);
        if let Some(first) = self.events.first() {
            path.push(first.from_status);
        }
        path.extend(self.events.iter().map(|e| e.to_status));
        path
    }

    /// Time between the first and last arbitration, if any events exist.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.events.first()?, self.events.last()?);
        last.arbitrated_at
            .signed_duration_since(first.arbitrated_at)
            .to_std()
            .ok()
    }

    /// Sequence of the latest event, 0 when empty.
    pub fn last_sequence(&self) -> u64 {
        self.events.last().map_or(0, |e| e.sequence)
    }

    /// True when sequences run 1, 2, 3, ... with no gap or repeat.
    pub fn is_contiguous(&self) -> bool {
        self.events
            .iter()
            .zip(1u64..)
            .all(|(event, expected)| event.sequence == expected)
    }

    /// True when every event starts where the previous one ended.
    pub fn is_chained(&self) -> bool {
        self.events
            .windows(2)
            .all(|pair| pair[0].to_status == pair[1].from_status)
    }

    pub fn events(&self) -> &[TransitionEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use HaulerStatus::*;

    fn pending(from: HaulerStatus, to: HaulerStatus, cause: &str) -> PendingTransition {
        PendingTransition {
            hauler_id: HaulerId::new("HT-1"),
            cycle_id: Some(CycleId::new("C-1")),
            from_status: from,
            to_status: to,
            cause: cause.to_string(),
            device_time: Utc::now(),
            automatic: false,
        }
    }

    #[test]
    fn dedup_key_renders_missing_cycle() {
        let key = dedup_key(&HaulerId::new("HT-1"), None, 3, "MANUAL");
        assert_eq!(key.as_str(), "HT-1_none_3_MANUAL");
    }

    #[test]
    fn into_event_takes_next_sequence() {
        let event = pending(Standby, Queuing, "MANUAL").into_event(4, Utc::now());
        assert_eq!(event.sequence, 5);
        assert_eq!(event.id.as_str(), "HT-1_C-1_5_MANUAL");
    }

    #[test]
    fn same_slot_and_cause_collide() {
        let now = Utc::now();
        let a = pending(Standby, Queuing, "MANUAL").into_event(0, now);
        let b = pending(Standby, Queuing, "MANUAL").into_event(0, now);
        let c = pending(Standby, Queuing, "OTHER").into_event(0, now);
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn colliding_key_with_other_target_is_not_the_same_transition() {
        let now = Utc::now();
        let applied = pending(HaulingEmpty, Standby, "STATUS_CHANGE").into_event(0, now);
        let replay = pending(HaulingEmpty, Standby, "STATUS_CHANGE").into_event(0, Utc::now());
        let other = pending(HaulingEmpty, Queuing, "STATUS_CHANGE").into_event(0, now);

        assert_eq!(applied.id, other.id);
        assert!(applied.same_transition(&replay));
        assert!(!applied.same_transition(&other));
    }

    #[test]
    fn new_history_is_empty() {
        let history = EventHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.last_sequence(), 0);
        assert!(history.is_contiguous());
    }

    #[test]
    fn record_is_immutable() {
        let history = EventHistory::new();
        let next = history.record(pending(Standby, Queuing, "MANUAL").into_event(0, Utc::now()));
        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn path_and_contiguity_follow_events() {
        let now = Utc::now();
        let history = EventHistory::new()
            .record(pending(Standby, Queuing, "MANUAL").into_event(0, now))
            .record(pending(Queuing, Spotting, "MANUAL").into_event(1, now));

        assert_eq!(history.get_path(), vec![Standby, Queuing, Spotting]);
        assert!(history.is_contiguous());
        assert!(history.is_chained());
        assert_eq!(history.last_sequence(), 2);
    }

    #[test]
    fn gap_breaks_contiguity() {
        let now = Utc::now();
        let history = EventHistory::from_events(vec![
            pending(Queuing, Spotting, "MANUAL").into_event(2, now),
            pending(Standby, Queuing, "MANUAL").into_event(0, now),
        ]);
        assert_eq!(history.events()[0].sequence, 1);
        assert!(!history.is_contiguous());
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let history = EventHistory::new()
            .record(pending(Standby, Queuing, "MANUAL").into_event(0, start))
            .record(
                pending(Queuing, Standby, "MANUAL")
                    .into_event(1, start + chrono::Duration::seconds(90)),
            );
        assert_eq!(history.duration(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn event_serializes_with_camel_case() {
        let event = pending(HaulingLoad, Dumping, "BODY_UP").into_event(7, Utc::now());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["fromStatus"], "HAULING_LOAD");
        assert_eq!(json["toStatus"], "DUMPING");
        assert_eq!(json["sequence"], 8);
        let back: TransitionEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
