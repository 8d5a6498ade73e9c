//! Guard evaluation for manual transitions.

use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

use crate::core::{table, HaulerStatus};
use crate::enforcement::builder::GuardRulesBuilder;
use crate::enforcement::context::{GuardContext, GuardLimits};
use crate::enforcement::violations::{GuardVerdict, GuardViolation};

/// Type alias for guard check functions
pub type GuardCheck = Box<
    dyn Fn(&GuardContext<'_>, &GuardLimits) -> Validation<(), NonEmptyVec<GuardViolation>>
        + Send
        + Sync,
>;

pub(crate) struct PairCheck {
    pub(crate) from: HaulerStatus,
    pub(crate) to: HaulerStatus,
    pub(crate) check: GuardCheck,
}

/// Guard set for manual transitions.
/// Uses Validation to accumulate every violated guard of a pair.
pub struct GuardRules {
    pub(crate) limits: GuardLimits,
    pub(crate) checks: Vec<PairCheck>,
}

impl GuardRules {
    /// The fixed hauler guard set.
    pub fn standard(limits: GuardLimits) -> Self {
        use HaulerStatus::*;

        GuardRulesBuilder::new(limits)
            .require_pred(
                Queuing,
                Spotting,
                |ctx| ctx.loader.is_some_and(|l| l.waiting_for_truck),
                GuardViolation::LoaderNotWaiting,
            )
            .require(Queuing, Spotting, inside_loader_radius)
            .require(Queuing, Spotting, fix_is_accurate)
            .require_pred(
                HaulingLoad,
                Dumping,
                |ctx| ctx.hauler.body_raised,
                GuardViolation::BodyNotRaised,
            )
            .require(HaulingLoad, Dumping, inside_dump_radius)
            .require_pred(
                Dumping,
                HaulingEmpty,
                |ctx| !ctx.hauler.body_raised,
                GuardViolation::BodyStillRaised,
            )
            .build()
    }

    pub fn limits(&self) -> &GuardLimits {
        &self.limits
    }

    /// Evaluate a requested transition (pure).
    ///
    /// Table membership is checked first and short-circuits; pair guards are
    /// then all evaluated and every violation is kept.
    pub fn evaluate(&self, ctx: &GuardContext<'_>) -> GuardVerdict {
        let Some(to) = ctx.to else {
            return GuardVerdict::rejected(GuardViolation::MissingTarget);
        };

        if !table::is_allowed(ctx.from, to) {
            return GuardVerdict::rejected(GuardViolation::NotAllowed { from: ctx.from, to });
        }

        let checks: Vec<Validation<(), NonEmptyVec<GuardViolation>>> = self
            .checks
            .iter()
            .filter(|pair| pair.from == ctx.from && pair.to == to)
            .map(|pair| (pair.check)(ctx, &self.limits))
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(_) => GuardVerdict::Allowed,
            Validation::Failure(violations) => {
                GuardVerdict::Rejected(violations.iter().cloned().collect())
            }
        }
    }
}

impl Default for GuardRules {
    fn default() -> Self {
        Self::standard(GuardLimits::default())
    }
}

fn fail(violation: GuardViolation) -> Validation<(), NonEmptyVec<GuardViolation>> {
    Validation::fail(violation)
}

fn inside_loader_radius(
    ctx: &GuardContext<'_>,
    limits: &GuardLimits,
) -> Validation<(), NonEmptyVec<GuardViolation>> {
    let (Some(location), Some(loader)) = (ctx.location, ctx.loader) else {
        return Validation::success(());
    };
    let radius_m = loader.radius_or(limits.loader_radius_m);
    let distance_m = location.distance_to(&loader.location);
    if distance_m <= radius_m {
        Validation::success(())
    } else {
        fail(GuardViolation::OutsideLoaderRadius {
            distance_m,
            radius_m,
        })
    }
}

fn fix_is_accurate(
    ctx: &GuardContext<'_>,
    limits: &GuardLimits,
) -> Validation<(), NonEmptyVec<GuardViolation>> {
    match ctx.location.and_then(|l| l.accuracy) {
        Some(accuracy_m) if accuracy_m > limits.gps_accuracy_threshold_m => {
            fail(GuardViolation::LowGpsAccuracy {
                accuracy_m,
                threshold_m: limits.gps_accuracy_threshold_m,
            })
        }
        _ => Validation::success(()),
    }
}

fn inside_dump_radius(
    ctx: &GuardContext<'_>,
    limits: &GuardLimits,
) -> Validation<(), NonEmptyVec<GuardViolation>> {
    let Some(location) = ctx.location else {
        return Validation::success(());
    };
    let Some((dump_site, radius_m)) = ctx
        .cycle
        .and_then(|c| c.dump_location.map(|site| (site, c.dump_radius_or(limits.dump_radius_m))))
    else {
        return Validation::success(());
    };
    let distance_m = location.distance_to(&dump_site);
    if distance_m <= radius_m {
        Validation::success(())
    } else {
        fail(GuardViolation::OutsideDumpRadius {
            distance_m,
            radius_m,
        })
    }
}
