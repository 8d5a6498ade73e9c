//! Telemetry samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hauler::LiveFields;
use super::ids::{HaulerId, TelemetryId};
use crate::core::GeoPoint;

/// The `telemetry/{telemetryId}` document. Immutable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    #[serde(default = "TelemetryId::generate")]
    pub id: TelemetryId,
    pub hauler_id: HaulerId,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
    pub body_up: bool,
    pub device_time: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl TelemetryRecord {
    pub fn new(hauler_id: impl Into<HaulerId>, location: GeoPoint, body_up: bool) -> Self {
        let now = Utc::now();
        Self {
            id: TelemetryId::generate(),
            hauler_id: hauler_id.into(),
            lat: location.lat,
            lng: location.lng,
            accuracy: location.accuracy,
            body_up,
            device_time: now,
            created_at: now,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
            accuracy: self.accuracy,
        }
    }

    pub fn live_fields(&self) -> LiveFields {
        LiveFields {
            location: self.location(),
            body_raised: self.body_up,
            device_time: self.device_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_reads_flat_document() {
        let record: TelemetryRecord = serde_json::from_str(
            r#"{"id":"t-1","haulerId":"HT-2","lat":-23.0,"lng":119.0,"bodyUp":true,
                "deviceTime":"2026-03-01T04:05:06Z","createdAt":"2026-03-01T04:05:07Z"}"#,
        )
        .unwrap();
        assert!(record.body_up);
        assert_eq!(record.location(), GeoPoint::new(-23.0, 119.0));
    }

    #[test]
    fn live_fields_follow_sample() {
        let record = TelemetryRecord::new("HT-2", GeoPoint::new(1.0, 2.0).with_accuracy(4.0), false);
        let live = record.live_fields();
        assert_eq!(live.location.accuracy, Some(4.0));
        assert!(!live.body_raised);
        assert_eq!(live.device_time, record.device_time);
    }
}
