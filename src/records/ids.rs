//! Document identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

document_id!(
    /// Key of `haulers/{haulerId}`.
    HaulerId
);
document_id!(
    /// Key of `cycles/{cycleId}`.
    CycleId
);
document_id!(
    /// Key of `loaders/{loaderId}`.
    LoaderId
);
document_id!(
    /// Key of `intents/{intentId}`.
    IntentId
);
document_id!(
    /// Key of `telemetry/{telemetryId}`.
    TelemetryId
);
document_id!(
    /// Key of `hauler_events/{eventId}`; always the event's dedup key.
    EventId
);

impl IntentId {
    /// Fresh random id for intents submitted without one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl TelemetryId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = HaulerId::new("HT-07");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"HT-07\"");
        let back: HaulerId = serde_json::from_str("\"HT-07\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(IntentId::generate(), IntentId::generate());
        assert_ne!(TelemetryId::generate(), TelemetryId::generate());
    }
}
