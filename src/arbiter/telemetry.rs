//! Telemetry monitor: live field updates and automatic transitions.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{Arbiter, ArbiterError};
use crate::core::{HaulerStatus, PendingTransition};
use crate::enforcement::auto;
use crate::records::{EventId, HaulerProjection, TelemetryRecord};

/// What one telemetry sample did.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TelemetryOutcome {
    /// Live fields refreshed; no transition was due.
    Updated,
    /// Live fields refreshed and an automatic transition committed.
    AutoTransitioned {
        #[serde(rename = "eventId")]
        event_id: EventId,
        to: HaulerStatus,
    },
    /// The transition this sample triggers had already been written.
    AlreadyApplied {
        #[serde(rename = "eventId")]
        event_id: EventId,
    },
    /// Sample for a hauler with no projection; ignored.
    UnknownHauler,
    /// Processing failed; the sample was dropped after logging.
    Dropped { reason: String },
}

impl Arbiter {
    /// Apply one telemetry sample.
    ///
    /// Live fields are written unconditionally. If the sample qualifies for an
    /// automatic transition, it is committed through the same conditional
    /// write as manual requests. Failures never propagate; the sample is
    /// dropped and the next one is evaluated afresh.
    #[instrument(skip_all, fields(telemetry_id = %record.id, hauler_id = %record.hauler_id))]
    pub async fn handle_telemetry(&self, record: &TelemetryRecord) -> TelemetryOutcome {
        match self.process_telemetry(record).await {
            Ok(outcome) => outcome,
            Err(ArbiterError::DuplicateEvent { event_id }) => {
                TelemetryOutcome::AlreadyApplied { event_id }
            }
            Err(err) => {
                warn!(error = %err, "telemetry dropped");
                TelemetryOutcome::Dropped {
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn process_telemetry(
        &self,
        record: &TelemetryRecord,
    ) -> Result<TelemetryOutcome, ArbiterError> {
        let live = record.live_fields();

        let known = self
            .bounded(
                "update_live_fields",
                self.store.update_live_fields(&record.hauler_id, live),
            )
            .await?;
        if !known {
            debug!("telemetry for unknown hauler ignored");
            return Ok(TelemetryOutcome::UnknownHauler);
        }

        let hauler = match self.load_hauler(&record.hauler_id).await {
            Ok(hauler) => hauler,
            Err(ArbiterError::NotFound { .. }) => return Ok(TelemetryOutcome::UnknownHauler),
            Err(err) => return Err(err),
        };
        let Some(cycle_id) = hauler.active_cycle_id.clone() else {
            return Ok(TelemetryOutcome::Updated);
        };
        let (cycle, loader) = self.load_cycle_context(Some(&cycle_id), &hauler).await?;
        let limits = *self.rules.limits();

        let plan = |current: &HaulerProjection| {
            Ok::<_, ArbiterError>(
                auto::detect(current, cycle.as_ref(), loader.as_ref(), &live, &limits).map(
                    |found| PendingTransition {
                        hauler_id: current.id.clone(),
                        cycle_id: Some(cycle_id.clone()),
                        from_status: current.status,
                        to_status: found.to,
                        cause: found.trigger.as_str().to_string(),
                        device_time: record.device_time,
                        automatic: true,
                    },
                ),
            )
        };

        match self.commit_with_retry(hauler, Some(live), plan).await? {
            Some(event) => {
                info!(to = %event.to_status, trigger = %event.cause, "automatic transition");
                Ok(TelemetryOutcome::AutoTransitioned {
                    event_id: event.id,
                    to: event.to_status,
                })
            }
            None => Ok(TelemetryOutcome::Updated),
        }
    }
}
