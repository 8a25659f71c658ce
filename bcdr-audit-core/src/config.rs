//! Audit configuration.
//!
//! Policy knobs plus the roster of appliances to audit, loaded from TOML:
//!
//! ```toml
//! local_verification_scope = "per_device"
//! create_tasks_for_clean_devices = false
//!
//! [[devices]]
//! client = "Acme Dental"
//! provider = "Datto BCDR"
//! appliance = "ADGSPBCS01"
//! notes = "front office"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aggregate::LocalVerificationScope;
use crate::error::ConfigError;
use crate::model::AuditedDevice;

/// Environment variable forcing a dry run.
pub const DRY_RUN_ENV: &str = "BCDR_AUDIT_DRY_RUN";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub local_verification_scope: LocalVerificationScope,

    /// Also open tasks for devices with nothing to report.
    #[serde(default)]
    pub create_tasks_for_clean_devices: bool,

    /// Render reports but never call the task sink.
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub devices: Vec<AuditedDevice>,
}

impl AuditConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from a file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env_overrides();

        log::info!(
            "CONFIG_LOADED path={} devices={} scope={} dry_run={}",
            path.display(),
            config.devices.len(),
            config.local_verification_scope.as_str(),
            config.dry_run
        );

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_dry_run_override(std::env::var(DRY_RUN_ENV).ok().as_deref());
    }

    /// An unset variable keeps the file's value; a set one replaces it.
    fn apply_dry_run_override(&mut self, value: Option<&str>) {
        if let Some(value) = value {
            self.dry_run = parse_flag(value);
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
