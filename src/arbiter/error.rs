//! Arbitration error taxonomy.

use thiserror::Error;

use crate::enforcement::GuardViolation;
use crate::records::{EventId, HaulerId};
use crate::store::StoreError;

/// Errors that can occur while arbitrating a transition
#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("hauler not found: {hauler_id}")]
    NotFound { hauler_id: HaulerId },

    #[error("{reason}")]
    GuardRejected {
        reason: String,
        violations: Vec<GuardViolation>,
    },

    #[error("hauler {hauler_id} kept changing; gave up after {attempts} attempts")]
    Conflict { hauler_id: HaulerId, attempts: u32 },

    #[error("event {event_id} already applied")]
    DuplicateEvent { event_id: EventId },

    #[error("internal error: {0}")]
    Internal(#[from] StoreError),
}

impl ArbiterError {
    pub(crate) fn rejected(violations: Vec<GuardViolation>) -> Self {
        let reason = violations
            .first()
            .map_or_else(|| "transition rejected".to_string(), ToString::to_string);
        Self::GuardRejected { reason, violations }
    }

    /// Reason recorded on a failed intent.
    ///
    /// Storage details stay in the logs; the intent only says "internal error".
    pub fn intent_reason(&self) -> String {
        match self {
            Self::NotFound { .. } => "hauler not found".to_string(),
            Self::GuardRejected { reason, .. } => reason.clone(),
            Self::Conflict { .. } => "transient conflict, retry later".to_string(),
            Self::DuplicateEvent { .. } => "already applied".to_string(),
            Self::Internal(_) => "internal error".to_string(),
        }
    }

    /// True for failures that may succeed if the whole request is resubmitted.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reason_is_first_violation() {
        let err = ArbiterError::rejected(vec![
            GuardViolation::BodyNotRaised,
            GuardViolation::OutsideDumpRadius {
                distance_m: 90.0,
                radius_m: 40.0,
            },
        ]);
        assert_eq!(err.intent_reason(), "body not raised");
        assert_eq!(err.to_string(), "body not raised");
        assert!(!err.is_transient());
    }

    #[test]
    fn internal_errors_hide_storage_details() {
        let err = ArbiterError::from(StoreError::Unavailable("replica lag".to_string()));
        assert_eq!(err.intent_reason(), "internal error");
        assert!(err.to_string().contains("replica lag"));
        assert!(err.is_transient());
    }

    #[test]
    fn not_found_reason_is_generic() {
        let err = ArbiterError::NotFound {
            hauler_id: HaulerId::new("HT-404"),
        };
        assert_eq!(err.intent_reason(), "hauler not found");
    }
}
