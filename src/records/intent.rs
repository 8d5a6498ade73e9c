//! Client intents and their arbitration outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{CycleId, EventId, HaulerId, IntentId};
use crate::core::{GeoPoint, HaulerStatus};

/// The client-written part of an `intents/{intentId}` document.
///
/// Immutable once submitted. `context` is passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    #[serde(default = "IntentId::generate")]
    pub id: IntentId,
    pub hauler_id: HaulerId,
    #[serde(default)]
    pub cycle_id: Option<CycleId>,
    /// Free-form intent kind; becomes the event cause.
    #[serde(rename = "type")]
    pub intent_type: String,
    #[serde(default)]
    pub requested_status: Option<HaulerStatus>,
    pub device_time: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl Intent {
    pub fn new(
        hauler_id: impl Into<HaulerId>,
        intent_type: impl Into<String>,
        requested_status: HaulerStatus,
    ) -> Self {
        Self {
            id: IntentId::generate(),
            hauler_id: hauler_id.into(),
            cycle_id: None,
            intent_type: intent_type.into(),
            requested_status: Some(requested_status),
            device_time: Utc::now(),
            location: None,
            context: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<IntentId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_cycle(mut self, cycle_id: impl Into<CycleId>) -> Self {
        self.cycle_id = Some(cycle_id.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}

/// The arbiter-written part of an intent document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentOutcome {
    pub processed: bool,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_event_id: Option<EventId>,
    pub processed_at: DateTime<Utc>,
}

impl IntentOutcome {
    pub fn succeeded(event_id: EventId) -> Self {
        Self {
            processed: true,
            success: true,
            error_message: None,
            result_event_id: Some(event_id),
            processed_at: Utc::now(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            processed: true,
            success: false,
            error_message: Some(reason.into()),
            result_event_id: None,
            processed_at: Utc::now(),
        }
    }
}
