//! Error types.
//!
//! Core errors are typed; collaborator failures (transport, auth) arrive as
//! `anyhow::Error` and are carried through untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A history record that breaks the provider's data contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed event for agent {agent} at {timestamp}: {reason}")]
pub struct MalformedEventError {
    pub agent: String,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

/// Per-device audit failure. Never aborts the run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    MalformedEvent(#[from] MalformedEventError),

    #[error("no provider serial found for appliance {appliance}")]
    NotFound { appliance: String },

    #[error("inventory lookup failed: {0:#}")]
    Inventory(anyhow::Error),

    #[error("history fetch failed: {0:#}")]
    History(anyhow::Error),

    #[error("task creation failed: {0:#}")]
    TaskSink(anyhow::Error),
}

impl AuditError {
    /// Short tag used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::MalformedEvent(_) => "malformed_event",
            AuditError::NotFound { .. } => "not_found",
            AuditError::Inventory(_) => "inventory",
            AuditError::History(_) => "history",
            AuditError::TaskSink(_) => "task_sink",
        }
    }
}

/// Provider payload could not be decoded into the event model.
#[derive(Debug, Error)]
pub enum ProviderPayloadError {
    #[error("invalid provider JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("agent {agent}: invalid timestamp {value:?}: {source}")]
    Timestamp {
        agent: String,
        value: String,
        source: chrono::ParseError,
    },

    #[error("agent {agent}: unknown {field} status {value:?}")]
    UnknownStatus {
        agent: String,
        field: &'static str,
        value: String,
    },
}

/// Configuration file could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
