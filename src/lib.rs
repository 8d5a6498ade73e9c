//! Hauler Arbiter: the sole authority over haul truck status
//!
//! Devices never write status directly. They submit *intents* (manual
//! requests) and *telemetry* (position and body sensor samples); the arbiter
//! evaluates both against a fixed transition table and geofence guards and
//! is the only writer of status, sequence and the append-only event log.
//!
//! Built on Stillwater's "pure core, imperative shell" philosophy: the table,
//! the guards, geofencing and automatic trigger detection are pure functions
//! in [`core`] and [`enforcement`]; storage, retries and logging live in
//! [`arbiter`].
//!
//! # Core Concepts
//!
//! - **Status**: the seven-state hauler cycle, via [`HaulerStatus`]
//! - **Guards**: validation rules that accumulate every unmet condition
//! - **Sequence**: per-hauler counter; every commit is conditional on it
//! - **History**: the ordered, immutable event log of a hauler
//!
//! # Example
//!
//! ```rust
//! use hauler_arbiter::core::{table, HaulerStatus};
//!
//! assert!(table::is_allowed(HaulerStatus::Standby, HaulerStatus::Queuing));
//! assert!(!table::is_allowed(HaulerStatus::Standby, HaulerStatus::Dumping));
//! ```

pub mod arbiter;
pub mod config;
pub mod core;
pub mod enforcement;
pub mod health;
pub mod records;
pub mod retention;
pub mod store;

// Re-export commonly used types
pub use arbiter::{Arbiter, ArbiterError, TelemetryOutcome};
pub use config::ArbiterConfig;
pub use core::{EventHistory, HaulerStatus, State, TransitionEvent};
pub use records::{HaulerProjection, Intent, IntentOutcome, TelemetryRecord};
pub use store::{InMemoryStore, Store};
