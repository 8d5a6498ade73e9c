//! Hauler status states.
//!
//! The `State` trait gives every status a stable name for logs, reasons and
//! event records. `HaulerStatus` is the one concrete implementation: the seven
//! positions a haul truck can occupy in the load-haul-dump loop.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for arbitrated states.
///
/// All methods are pure. States are immutable values that describe the
/// current position of a hauler in its operating cycle.
///
/// # Example
///
/// ```rust
/// use hauler_arbiter::core::{HaulerStatus, State};
///
/// assert_eq!(HaulerStatus::HaulingLoad.name(), "HAULING_LOAD");
/// assert!(!HaulerStatus::Standby.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Stable wire name, used in reasons, logs and dedup keys.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Operational status of a hauler.
///
/// There is no terminal state: a healthy hauler loops
/// `HAULING_EMPTY -> QUEUING -> SPOTTING -> LOADING -> HAULING_LOAD -> DUMPING -> HAULING_EMPTY`
/// and `STANDBY` is both the idle state and the universal abort target.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HaulerStatus {
    #[default]
    Standby,
    Queuing,
    Spotting,
    Loading,
    HaulingLoad,
    Dumping,
    HaulingEmpty,
}

impl HaulerStatus {
    /// Every status, in cycle order starting from idle.
    pub const ALL: [HaulerStatus; 7] = [
        HaulerStatus::Standby,
        HaulerStatus::Queuing,
        HaulerStatus::Spotting,
        HaulerStatus::Loading,
        HaulerStatus::HaulingLoad,
        HaulerStatus::Dumping,
        HaulerStatus::HaulingEmpty,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standby => "STANDBY",
            Self::Queuing => "QUEUING",
            Self::Spotting => "SPOTTING",
            Self::Loading => "LOADING",
            Self::HaulingLoad => "HAULING_LOAD",
            Self::Dumping => "DUMPING",
            Self::HaulingEmpty => "HAULING_EMPTY",
        }
    }
}

impl State for HaulerStatus {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HaulerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_name_matches_wire_name() {
        for status in HaulerStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.name()));
        }
    }

    #[test]
    fn no_status_is_final() {
        assert!(HaulerStatus::ALL.iter().all(|s| !s.is_final()));
    }

    #[test]
    fn default_is_standby() {
        assert_eq!(HaulerStatus::default(), HaulerStatus::Standby);
    }

    #[test]
    fn status_parses_from_wire_name() {
        let status: HaulerStatus = serde_json::from_str("\"HAULING_EMPTY\"").unwrap();
        assert_eq!(status, HaulerStatus::HaulingEmpty);
        assert!(serde_json::from_str::<HaulerStatus>("\"PARKED\"").is_err());
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(HaulerStatus::Dumping.to_string(), "DUMPING");
    }
}
