//! External collaborators of an audit run.
//!
//! Transport, authentication and retries live behind these traits; the
//! pipeline only sees plain data or an `anyhow::Error`.

use crate::model::{AuditedDevice, MonitoredAgent};

/// Resolves an appliance display name to a provider serial number.
pub trait InventoryLookup {
    /// `Ok(None)` means the provider does not list the appliance.
    fn resolve_serial(&self, appliance: &str) -> anyhow::Result<Option<String>>;
}

/// Retrieves agent backup history for one appliance.
pub trait HistorySource {
    fn fetch_agents(&self, serial: &str) -> anyhow::Result<Vec<MonitoredAgent>>;
}

/// Creates a tracking task from a rendered report.
pub trait TaskSink {
    /// Returns the id the ticketing system assigned.
    fn create_task(&self, device: &AuditedDevice, report: &str) -> anyhow::Result<String>;
}
