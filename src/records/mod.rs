//! Documents read and written by the arbiter.

mod cycle;
mod hauler;
mod ids;
mod intent;
mod telemetry;

pub use cycle::{Cycle, Loader};
pub use hauler::{HaulerProjection, LiveFields};
pub use ids::{CycleId, EventId, HaulerId, IntentId, LoaderId, TelemetryId};
pub use intent::{Intent, IntentOutcome};
pub use telemetry::TelemetryRecord;
