//! Pure core of the arbiter.
//!
//! - Hauler status via the `State` trait
//! - The static table of manual transitions
//! - Haversine geodesy for geofences
//! - Transition events and immutable per-hauler history
//!
//! Nothing in this module performs I/O.

mod geo;
mod history;
mod state;
pub mod table;

pub use geo::{haversine_m, GeoPoint, EARTH_RADIUS_M};
pub use history::{dedup_key, EventHistory, PendingTransition, TransitionEvent};
pub use state::{HaulerStatus, State};
