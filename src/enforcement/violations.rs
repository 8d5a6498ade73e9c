//! Guard violations and the verdict they roll up into.

use thiserror::Error;

use crate::core::HaulerStatus;

/// A single unmet transition guard. `Display` is the reason recorded on the
/// rejected intent.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GuardViolation {
    #[error("no target status specified")]
    MissingTarget,

    #[error("transition to {to} not allowed from {from}")]
    NotAllowed {
        from: HaulerStatus,
        to: HaulerStatus,
    },

    #[error("loader not waiting for truck")]
    LoaderNotWaiting,

    #[error("hauler not in loader radius ({distance_m:.1} m > {radius_m:.1} m)")]
    OutsideLoaderRadius { distance_m: f64, radius_m: f64 },

    #[error("gps accuracy too low ({accuracy_m:.1} m > {threshold_m:.1} m)")]
    LowGpsAccuracy { accuracy_m: f64, threshold_m: f64 },

    #[error("body not raised")]
    BodyNotRaised,

    #[error("hauler not in dump radius ({distance_m:.1} m > {radius_m:.1} m)")]
    OutsideDumpRadius { distance_m: f64, radius_m: f64 },

    #[error("body still raised")]
    BodyStillRaised,
}

/// Outcome of evaluating the guards for one requested transition.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardVerdict {
    Allowed,
    /// Every violated guard, in evaluation order. Never empty.
    Rejected(Vec<GuardViolation>),
}

impl GuardVerdict {
    pub(crate) fn rejected(violation: GuardViolation) -> Self {
        Self::Rejected(vec![violation])
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Reason for the rejection: the first violated guard.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Allowed => None,
            Self::Rejected(violations) => violations.first().map(ToString::to_string),
        }
    }

    pub fn violations(&self) -> &[GuardViolation] {
        match self {
            Self::Allowed => &[],
            Self::Rejected(violations) => violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_is_first_violation() {
        let verdict = GuardVerdict::Rejected(vec![
            GuardViolation::LoaderNotWaiting,
            GuardViolation::BodyNotRaised,
        ]);
        assert_eq!(verdict.reason().as_deref(), Some("loader not waiting for truck"));
        assert_eq!(verdict.violations().len(), 2);
    }

    #[test]
    fn allowed_has_no_reason() {
        assert!(GuardVerdict::Allowed.is_allowed());
        assert!(GuardVerdict::Allowed.reason().is_none());
        assert!(GuardVerdict::Allowed.violations().is_empty());
    }

    #[test]
    fn not_allowed_names_both_states() {
        let v = GuardViolation::NotAllowed {
            from: HaulerStatus::Standby,
            to: HaulerStatus::Loading,
        };
        assert_eq!(v.to_string(), "transition to LOADING not allowed from STANDBY");
    }

    #[test]
    fn radius_reason_reports_distance() {
        let v = GuardViolation::OutsideLoaderRadius {
            distance_m: 80.04,
            radius_m: 50.0,
        };
        assert_eq!(v.to_string(), "hauler not in loader radius (80.0 m > 50.0 m)");
    }
}
