//! Guard evaluation for hauler transitions.
//!
//! Manual transitions are gated by `GuardRules`: table membership first, then
//! the per-pair guards. Pair guards use Stillwater's `Validation` so every
//! unmet guard is collected, and the first one becomes the rejection reason.
//!
//! Automatic transitions are detected separately by [`auto::detect`] from a
//! single telemetry sample.
//!
//! # Example
//!
//! ```rust
//! use hauler_arbiter::core::HaulerStatus;
//! use hauler_arbiter::enforcement::{GuardContext, GuardRules};
//! use hauler_arbiter::records::HaulerProjection;
//!
//! let rules = GuardRules::default();
//! let hauler = HaulerProjection::new("HT-1").with_status(HaulerStatus::HaulingLoad);
//! let ctx = GuardContext::new(&hauler, Some(HaulerStatus::Dumping), None, None, None);
//!
//! assert_eq!(rules.evaluate(&ctx).reason().as_deref(), Some("body not raised"));
//! ```

pub mod auto;
pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use auto::{AutoTransition, AutoTrigger};
pub use builder::GuardRulesBuilder;
pub use context::{GuardContext, GuardLimits};
pub use rules::{GuardCheck, GuardRules};
pub use violations::{GuardVerdict, GuardViolation};
