//! Builder API for assembling per-pair guard checks.

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

use crate::core::HaulerStatus;
use crate::enforcement::context::{GuardContext, GuardLimits};
use crate::enforcement::rules::{GuardCheck, GuardRules, PairCheck};
use crate::enforcement::violations::GuardViolation;

/// Builder for creating guard rules
pub struct GuardRulesBuilder {
    limits: GuardLimits,
    checks: Vec<PairCheck>,
}

impl GuardRulesBuilder {
    pub fn new(limits: GuardLimits) -> Self {
        Self {
            limits,
            checks: Vec::new(),
        }
    }

    /// Add a validation check for `from -> to`
    pub fn require<F>(mut self, from: HaulerStatus, to: HaulerStatus, check: F) -> Self
    where
        F: Fn(&GuardContext<'_>, &GuardLimits) -> Validation<(), NonEmptyVec<GuardViolation>>
            + Send
            + Sync
            + 'static,
    {
        let check: GuardCheck = Box::new(check);
        self.checks.push(PairCheck { from, to, check });
        self
    }

    /// Add a simple predicate check that reports `violation` when it fails
    pub fn require_pred<F>(
        self,
        from: HaulerStatus,
        to: HaulerStatus,
        predicate: F,
        violation: GuardViolation,
    ) -> Self
    where
        F: Fn(&GuardContext<'_>) -> bool + Send + Sync + 'static,
    {
        self.require(from, to, move |ctx, _limits| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(violation.clone())
            }
        })
    }

    pub fn build(self) -> GuardRules {
        GuardRules {
            limits: self.limits,
            checks: self.checks,
        }
    }
}
