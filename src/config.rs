//! Arbiter configuration.
//!
//! ## Loading Order
//!
//! 1. `HAULER_ARBITER_CONFIG` environment variable (path to a TOML file)
//! 2. `hauler_arbiter.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Every key is optional; missing keys take their default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::enforcement::GuardLimits;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "HAULER_ARBITER_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "hauler_arbiter.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Read-guard-commit attempts before a sequence conflict is surfaced.
    pub max_commit_attempts: u32,
    /// Upper bound for any single storage call.
    pub storage_timeout_ms: u64,
    pub default_loader_radius_m: f64,
    pub default_dump_radius_m: f64,
    pub gps_accuracy_threshold_m: f64,
    pub telemetry_retention_days: u32,
    /// Maximum telemetry records deleted per retention sweep.
    pub purge_batch_limit: usize,
    /// Reported by the health payload.
    pub service_name: String,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 3,
            storage_timeout_ms: 5_000,
            default_loader_radius_m: 50.0,
            default_dump_radius_m: 40.0,
            gps_accuracy_threshold_m: 50.0,
            telemetry_retention_days: 7,
            purge_batch_limit: 500,
            service_name: "hauler-arbiter".to_string(),
        }
    }
}

impl ArbiterConfig {
    /// Load configuration using the standard search order.
    ///
    /// Never fails: unreadable or invalid files are logged and skipped.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded arbiter config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded arbiter config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        info!("No arbiter config found, using built-in defaults");
        Self::default()
    }

    /// Load and validate a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: PathBuf::new(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would disable arbitration or geofencing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.max_commit_attempts == 0 {
            errors.push("max_commit_attempts must be at least 1".to_string());
        }
        if self.storage_timeout_ms == 0 {
            errors.push("storage_timeout_ms must be positive".to_string());
        }
        for (name, value) in [
            ("default_loader_radius_m", self.default_loader_radius_m),
            ("default_dump_radius_m", self.default_dump_radius_m),
            ("gps_accuracy_threshold_m", self.gps_accuracy_threshold_m),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(format!("{name} must be a positive number (got {value})"));
            }
        }
        if self.telemetry_retention_days == 0 {
            errors.push("telemetry_retention_days must be at least 1".to_string());
        }
        if self.purge_batch_limit == 0 {
            errors.push("purge_batch_limit must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.telemetry_retention_days))
    }

    pub fn guard_limits(&self) -> GuardLimits {
        GuardLimits {
            loader_radius_m: self.default_loader_radius_m,
            dump_radius_m: self.default_dump_radius_m,
            gps_accuracy_threshold_m: self.gps_accuracy_threshold_m,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
