//! Telemetry-driven automatic transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{table, HaulerStatus};
use crate::enforcement::context::GuardLimits;
use crate::records::{Cycle, HaulerProjection, LiveFields, Loader};

/// Trigger names recorded as the cause of automatic events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AutoTrigger {
    EnteredLoaderRadius,
    BodyUp,
}

impl AutoTrigger {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnteredLoaderRadius => "ENTERED_LOADER_RADIUS",
            Self::BodyUp => "BODY_UP",
        }
    }
}

impl fmt::Display for AutoTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transition the telemetry sample qualifies for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoTransition {
    pub trigger: AutoTrigger,
    pub to: HaulerStatus,
}

/// Decide whether `sample` triggers an automatic transition (pure).
///
/// Only haulers working an active, uncompleted cycle qualify. The loader is
/// the one resolved from the cycle, or the hauler's assigned loader. At most
/// one transition is returned; the two triggers are exclusive by status.
pub fn detect(
    hauler: &HaulerProjection,
    cycle: Option<&Cycle>,
    loader: Option<&Loader>,
    sample: &LiveFields,
    limits: &GuardLimits,
) -> Option<AutoTransition> {
    let cycle = cycle.filter(|c| !c.completed)?;

    let candidate = match hauler.status {
        HaulerStatus::HaulingEmpty => loader
            .filter(|l| {
                sample
                    .location
                    .within(&l.location, l.radius_or(limits.loader_radius_m))
            })
            .map(|_| AutoTransition {
                trigger: AutoTrigger::EnteredLoaderRadius,
                to: HaulerStatus::Queuing,
            }),
        HaulerStatus::HaulingLoad if sample.body_raised => cycle
            .dump_location
            .filter(|site| {
                sample
                    .location
                    .within(site, cycle.dump_radius_or(limits.dump_radius_m))
            })
            .map(|_| AutoTransition {
                trigger: AutoTrigger::BodyUp,
                to: HaulerStatus::Dumping,
            }),
        _ => None,
    };

    candidate.filter(|auto| table::is_allowed(hauler.status, auto.to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeoPoint;
    use chrono::Utc;

    const DEG_PER_M: f64 = 1.0 / 111_195.0;

    fn site() -> GeoPoint {
        GeoPoint::new(-22.9, 118.6)
    }

    fn offset(meters: f64) -> GeoPoint {
        GeoPoint::new(site().lat + meters * DEG_PER_M, site().lng)
    }

    fn sample(location: GeoPoint, body_raised: bool) -> LiveFields {
        LiveFields {
            location,
            body_raised,
            device_time: Utc::now(),
        }
    }

    fn cycle() -> Cycle {
        Cycle::new("C-1", "HT-1")
            .with_loader("L-1")
            .with_dump_site(site(), Some(40.0))
    }

    #[test]
    fn empty_hauler_entering_loader_radius_queues() {
        let hauler = HaulerProjection::new("HT-1").with_status(HaulerStatus::HaulingEmpty);
        let loader = Loader::new("L-1", site()).with_radius(50.0);
        let found = detect(
            &hauler,
            Some(&cycle()),
            Some(&loader),
            &sample(offset(20.0), false),
            &GuardLimits::default(),
        );
        assert_eq!(
            found,
            Some(AutoTransition {
                trigger: AutoTrigger::EnteredLoaderRadius,
                to: HaulerStatus::Queuing
            })
        );
    }

    #[test]
    fn empty_hauler_outside_radius_stays() {
        let hauler = HaulerProjection::new("HT-1").with_status(HaulerStatus::HaulingEmpty);
        let loader = Loader::new("L-1", site()).with_radius(50.0);
        let found = detect(
            &hauler,
            Some(&cycle()),
            Some(&loader),
            &sample(offset(60.0), false),
            &GuardLimits::default(),
        );
        assert_eq!(found, None);
    }

    #[test]
    fn loaded_hauler_with_body_up_at_dump_dumps() {
        let hauler = HaulerProjection::new("HT-1").with_status(HaulerStatus::HaulingLoad);
        let found = detect(
            &hauler,
            Some(&cycle()),
            None,
            &sample(offset(10.0), true),
            &GuardLimits::default(),
        );
        assert_eq!(found.map(|a| a.trigger), Some(AutoTrigger::BodyUp));
        assert_eq!(found.map(|a| a.to), Some(HaulerStatus::Dumping));
    }

    #[test]
    fn body_down_at_dump_does_not_trigger() {
        let hauler = HaulerProjection::new("HT-1").with_status(HaulerStatus::HaulingLoad);
        let found = detect(
            &hauler,
            Some(&cycle()),
            None,
            &sample(offset(10.0), false),
            &GuardLimits::default(),
        );
        assert_eq!(found, None);
    }

    #[test]
    fn completed_or_missing_cycle_never_triggers() {
        let hauler = HaulerProjection::new("HT-1").with_status(HaulerStatus::HaulingLoad);
        let mut done = cycle();
        done.completed = true;
        let live = sample(offset(0.0), true);
        assert_eq!(detect(&hauler, Some(&done), None, &live, &GuardLimits::default()), None);
        assert_eq!(detect(&hauler, None, None, &live, &GuardLimits::default()), None);
    }

    #[test]
    fn other_statuses_never_trigger() {
        let loader = Loader::new("L-1", site());
        let live = sample(site(), true);
        for status in [
            HaulerStatus::Standby,
            HaulerStatus::Queuing,
            HaulerStatus::Spotting,
            HaulerStatus::Loading,
            HaulerStatus::Dumping,
        ] {
            let hauler = HaulerProjection::new("HT-1").with_status(status);
            let found = detect(&hauler, Some(&cycle()), Some(&loader), &live, &GuardLimits::default());
            assert_eq!(found, None, "{status} triggered");
        }
    }

    #[test]
    fn trigger_names_match_event_causes() {
        assert_eq!(AutoTrigger::EnteredLoaderRadius.to_string(), "ENTERED_LOADER_RADIUS");
        assert_eq!(AutoTrigger::BodyUp.as_str(), "BODY_UP");
    }
}
