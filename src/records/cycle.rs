//! Read-only reference data: haul cycles and loaders.

use serde::{Deserialize, Serialize};

use super::ids::{CycleId, HaulerId, LoaderId};
use crate::core::GeoPoint;

/// The `cycles/{cycleId}` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: CycleId,
    pub hauler_id: HaulerId,
    #[serde(default)]
    pub loader_id: Option<LoaderId>,
    #[serde(default)]
    pub dump_location: Option<GeoPoint>,
    #[serde(default)]
    pub dump_radius: Option<f64>,
    #[serde(default)]
    pub completed: bool,
}

impl Cycle {
    pub fn new(id: impl Into<CycleId>, hauler_id: impl Into<HaulerId>) -> Self {
        Self {
            id: id.into(),
            hauler_id: hauler_id.into(),
            loader_id: None,
            dump_location: None,
            dump_radius: None,
            completed: false,
        }
    }

    pub fn with_loader(mut self, loader_id: impl Into<LoaderId>) -> Self {
        self.loader_id = Some(loader_id.into());
        self
    }

    pub fn with_dump_site(mut self, location: GeoPoint, radius_m: Option<f64>) -> Self {
        self.dump_location = Some(location);
        self.dump_radius = radius_m;
        self
    }

    /// Dump acceptance radius, falling back to `default_m` when unset or non-positive.
    pub fn dump_radius_or(&self, default_m: f64) -> f64 {
        positive_or(self.dump_radius, default_m)
    }
}

/// The `loaders/{loaderId}` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loader {
    pub id: LoaderId,
    pub location: GeoPoint,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub waiting_for_truck: bool,
}

impl Loader {
    pub fn new(id: impl Into<LoaderId>, location: GeoPoint) -> Self {
        Self {
            id: id.into(),
            location,
            radius: None,
            waiting_for_truck: false,
        }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius = Some(radius_m);
        self
    }

    pub fn waiting(mut self, waiting: bool) -> Self {
        self.waiting_for_truck = waiting;
        self
    }

    pub fn radius_or(&self, default_m: f64) -> f64 {
        positive_or(self.radius, default_m)
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v > 0.0 => v,
        _ => default,
    }
}
