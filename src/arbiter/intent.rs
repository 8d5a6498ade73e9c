//! Manual status requests.

use tracing::{debug, error, info, instrument, warn};

use super::{Arbiter, ArbiterError};
use crate::core::{dedup_key, PendingTransition, TransitionEvent};
use crate::enforcement::{GuardContext, GuardVerdict, GuardViolation};
use crate::records::{HaulerProjection, Intent, IntentOutcome};

impl Arbiter {
    /// Arbitrate one intent and record its outcome.
    ///
    /// Every intent is marked processed exactly once, success or failure. A
    /// redelivered intent is not re-evaluated; its stored outcome is returned.
    /// Only a failure to record the outcome itself is returned as an error.
    #[instrument(skip_all, fields(intent_id = %intent.id, hauler_id = %intent.hauler_id, intent_type = %intent.intent_type))]
    pub async fn handle_intent(&self, intent: &Intent) -> Result<IntentOutcome, ArbiterError> {
        let outcome = match self
            .bounded("intent_outcome", self.store.intent_outcome(&intent.id))
            .await
        {
            Ok(Some(previous)) => {
                debug!("intent already processed");
                return Ok(previous);
            }
            Ok(None) => self.decide(intent).await,
            Err(err) => {
                error!(error = %err, "could not read intent state");
                IntentOutcome::failed(ArbiterError::from(err).intent_reason())
            }
        };

        let first = self
            .bounded(
                "mark_intent_processed",
                self.store.mark_intent_processed(&intent.id, &outcome),
            )
            .await?;

        if !first {
            // A concurrent delivery recorded its outcome first.
            if let Some(stored) = self
                .bounded("intent_outcome", self.store.intent_outcome(&intent.id))
                .await?
            {
                return Ok(stored);
            }
        }

        Ok(outcome)
    }

    async fn decide(&self, intent: &Intent) -> IntentOutcome {
        match self.arbitrate_intent(intent).await {
            Ok(event) => IntentOutcome::succeeded(event.id),
            Err(ArbiterError::DuplicateEvent { event_id }) => IntentOutcome::succeeded(event_id),
            Err(err) => {
                match &err {
                    ArbiterError::GuardRejected { violations, .. } => {
                        info!(reason = %err, violations = violations.len(), "intent rejected");
                    }
                    ArbiterError::NotFound { .. } => info!("intent for unknown hauler"),
                    ArbiterError::Conflict { attempts, .. } => {
                        warn!(attempts, "intent gave up on contention");
                    }
                    _ => error!(error = %err, "intent failed"),
                }
                IntentOutcome::failed(err.intent_reason())
            }
        }
    }

    async fn arbitrate_intent(&self, intent: &Intent) -> Result<TransitionEvent, ArbiterError> {
        let hauler = self.load_hauler(&intent.hauler_id).await?;
        if let Some(applied) = self.applied_by(intent, &hauler).await? {
            debug!(event_id = %applied.id, "intent already applied");
            return Err(ArbiterError::DuplicateEvent { event_id: applied.id });
        }
        let (cycle, loader) = self
            .load_cycle_context(intent.cycle_id.as_ref(), &hauler)
            .await?;

        let plan = |current: &HaulerProjection| {
            let ctx = GuardContext::new(
                current,
                intent.requested_status,
                intent.location,
                cycle.as_ref(),
                loader.as_ref(),
            );
            match (self.rules.evaluate(&ctx), intent.requested_status) {
                (GuardVerdict::Allowed, Some(to)) => Ok(Some(PendingTransition {
                    hauler_id: intent.hauler_id.clone(),
                    cycle_id: intent.cycle_id.clone(),
                    from_status: ctx.from,
                    to_status: to,
                    cause: intent.intent_type.clone(),
                    device_time: intent.device_time,
                    automatic: false,
                })),
                (GuardVerdict::Allowed, None) => {
                    Err(ArbiterError::rejected(vec![GuardViolation::MissingTarget]))
                }
                (GuardVerdict::Rejected(violations), _) => Err(ArbiterError::rejected(violations)),
            }
        };

        self.commit_with_retry(hauler, None, plan)
            .await?
            .ok_or_else(|| ArbiterError::rejected(vec![GuardViolation::MissingTarget]))
    }

    /// The latest event of `hauler`, if this intent is what produced it.
    ///
    /// Covers redelivery after the transition committed but the intent was
    /// never marked: the guards would now reject the pair they already passed.
    async fn applied_by(
        &self,
        intent: &Intent,
        hauler: &HaulerProjection,
    ) -> Result<Option<TransitionEvent>, ArbiterError> {
        let Some(to) = intent.requested_status else {
            return Ok(None);
        };
        if hauler.sequence == 0 {
            return Ok(None);
        }

        let key = dedup_key(
            &intent.hauler_id,
            intent.cycle_id.as_ref(),
            hauler.sequence,
            &intent.intent_type,
        );
        let latest = self.bounded("get_event", self.store.get_event(&key)).await?;
        Ok(latest.filter(|event| event.to_status == to && !event.automatic))
    }
}
