//! Current-state projection of a hauler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CycleId, HaulerId, LoaderId};
use crate::core::{GeoPoint, HaulerStatus};

/// The `haulers/{haulerId}` document.
///
/// `status` and `sequence` only ever move together, through a store commit.
/// The live fields (`location`, `body_raised`, `online`, `last_device_time`)
/// follow every telemetry sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaulerProjection {
    pub id: HaulerId,
    #[serde(default)]
    pub status: HaulerStatus,
    /// Sequence of the last applied event; 0 before the first one.
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub body_raised: bool,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub last_device_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_status_change_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub active_cycle_id: Option<CycleId>,
    #[serde(default)]
    pub assigned_loader_id: Option<LoaderId>,
}

impl HaulerProjection {
    /// A fresh, idle hauler with no events applied.
    pub fn new(id: impl Into<HaulerId>) -> Self {
        Self {
            id: id.into(),
            status: HaulerStatus::Standby,
            sequence: 0,
            location: None,
            body_raised: false,
            online: false,
            last_device_time: None,
            last_status_change_at: None,
            active_cycle_id: None,
            assigned_loader_id: None,
        }
    }

    pub fn with_status(mut self, status: HaulerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_body_raised(mut self, raised: bool) -> Self {
        self.body_raised = raised;
        self
    }

    pub fn with_cycle(mut self, cycle_id: impl Into<CycleId>) -> Self {
        self.active_cycle_id = Some(cycle_id.into());
        self
    }

    pub fn with_loader(mut self, loader_id: impl Into<LoaderId>) -> Self {
        self.assigned_loader_id = Some(loader_id.into());
        self
    }

    /// Overwrite the live fields from a telemetry sample.
    pub fn apply_live(&mut self, live: &LiveFields) {
        self.location = Some(live.location);
        self.body_raised = live.body_raised;
        self.online = true;
        self.last_device_time = Some(live.device_time);
    }
}

/// Physical state carried by one telemetry sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveFields {
    pub location: GeoPoint,
    pub body_raised: bool,
    pub device_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_hauler_is_idle_with_no_events() {
        let hauler = HaulerProjection::new("HT-01");
        assert_eq!(hauler.status, HaulerStatus::Standby);
        assert_eq!(hauler.sequence, 0);
        assert!(!hauler.online);
    }

    #[test]
    fn apply_live_marks_hauler_online() {
        let mut hauler = HaulerProjection::new("HT-01").with_status(HaulerStatus::Loading);
        let live = LiveFields {
            location: GeoPoint::new(-23.1, 119.2),
            body_raised: true,
            device_time: Utc::now(),
        };
        hauler.apply_live(&live);

        assert!(hauler.online);
        assert!(hauler.body_raised);
        assert_eq!(hauler.location, Some(live.location));
        assert_eq!(hauler.status, HaulerStatus::Loading);
        assert_eq!(hauler.sequence, 0);
    }

    #[test]
    fn projection_uses_camel_case_fields() {
        let hauler = HaulerProjection::new("HT-01").with_cycle("C-1");
        let json = serde_json::to_value(&hauler).unwrap();
        assert_eq!(json["activeCycleId"], "C-1");
        assert_eq!(json["bodyRaised"], false);
        assert_eq!(json["status"], "STANDBY");
    }
}
