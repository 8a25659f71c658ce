//! Appliances and the agents they back up.

use serde::{Deserialize, Serialize};

use super::event::BackupEvent;

/// One backed-up workload hosted on an appliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredAgent {
    pub name: String,
    pub is_paused: bool,
    pub is_archived: bool,
    /// Chronological history for the audit window.
    pub events: Vec<BackupEvent>,
}

impl MonitoredAgent {
    pub fn new(name: &str, events: Vec<BackupEvent>) -> Self {
        Self {
            name: name.to_string(),
            is_paused: false,
            is_archived: false,
            events,
        }
    }

    /// Paused and archived agents are left out of auditing entirely.
    pub fn is_excluded(&self) -> bool {
        self.is_paused || self.is_archived
    }
}

/// A roster entry: the appliance being audited and who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditedDevice {
    pub client: String,
    /// Backup service / provider name.
    pub provider: String,
    /// Appliance display name as listed by the provider.
    pub appliance: String,
    /// Known provider serial; resolved through inventory when absent.
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl AuditedDevice {
    pub fn new(client: &str, provider: &str, appliance: &str) -> Self {
        Self {
            client: client.to_string(),
            provider: provider.to_string(),
            appliance: appliance.to_string(),
            serial: None,
            notes: String::new(),
        }
    }

    pub fn with_serial(mut self, serial: &str) -> Self {
        self.serial = Some(serial.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_string();
        self
    }
}
