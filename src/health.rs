//! Liveness payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ArbiterConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub service: String,
}

/// Report the service as up. Touches no storage.
pub fn health_check(config: &ArbiterConfig) -> HealthStatus {
    HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        service: config.service_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_ok_with_service_name() {
        let health = health_check(&ArbiterConfig::default());
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "hauler-arbiter");
        assert!(json["timestamp"].is_string());
    }
}
