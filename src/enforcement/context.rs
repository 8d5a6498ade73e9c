//! Inputs available to guard checks.

use crate::core::{GeoPoint, HaulerStatus};
use crate::records::{Cycle, HaulerProjection, Loader};

/// Snapshot a guard check evaluates against.
#[derive(Clone, Debug)]
pub struct GuardContext<'a> {
    pub from: HaulerStatus,
    pub to: Option<HaulerStatus>,
    /// Trigger location, already resolved against the projection.
    pub location: Option<GeoPoint>,
    pub hauler: &'a HaulerProjection,
    pub cycle: Option<&'a Cycle>,
    pub loader: Option<&'a Loader>,
}

impl<'a> GuardContext<'a> {
    /// Context for a manual request from the hauler's current status.
    ///
    /// The trigger location is the intent-supplied one if present, else the
    /// hauler's last known location.
    pub fn new(
        hauler: &'a HaulerProjection,
        to: Option<HaulerStatus>,
        trigger_location: Option<GeoPoint>,
        cycle: Option<&'a Cycle>,
        loader: Option<&'a Loader>,
    ) -> Self {
        Self {
            from: hauler.status,
            to,
            location: trigger_location.or(hauler.location),
            hauler,
            cycle,
            loader,
        }
    }
}

/// Geofence and fix-quality limits applied by the guards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardLimits {
    /// Used when a loader carries no radius of its own.
    pub loader_radius_m: f64,
    /// Used when a cycle carries no dump radius of its own.
    pub dump_radius_m: f64,
    /// Fixes less accurate than this cannot authorize loader entry.
    pub gps_accuracy_threshold_m: f64,
}

impl Default for GuardLimits {
    fn default() -> Self {
        Self {
            loader_radius_m: 50.0,
            dump_radius_m: 40.0,
            gps_accuracy_threshold_m: 50.0,
        }
    }
}
