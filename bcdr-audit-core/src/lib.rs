//! BCDR Audit Core - Backup health auditing for managed appliances
//!
//! This crate audits backup history pulled from a BCDR provider and turns
//! failures into incident text for a ticketing system. The implementation
//! prioritizes:
//!
//! 1. **Determinism** - Identical history always renders identical text
//! 2. **Logging** - Every decision point logged with run/device context
//! 3. **Isolation** - The core performs no I/O; collaborators are injected
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `model` - Backup events, agents and audited devices
//! - `classify` - Remote vs local-verification failure classification
//! - `aggregate` - Reportability and per-agent summaries
//! - `render` - Deterministic incident text and digests
//! - `pipeline` - Audit run orchestrator and collaborator traits
//! - `provider` - Provider payload decoding (asset history, inventory)
//! - `config` - TOML roster and policy
//! - `logging` - Structured logging with run context

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;

pub use aggregate::{failing_agents, is_reportable, summarize, CategoryErrors, LocalVerificationScope, PerAgentSummary};
pub use classify::{classify, DeviceAlertReport, FailureRecord};
pub use config::AuditConfig;
pub use error::{AuditError, ConfigError, MalformedEventError, ProviderPayloadError};
pub use logging::init_logger;
pub use model::{AuditedDevice, BackupEvent, LocalVerificationStatus, MonitoredAgent, RemoteStatus};
pub use pipeline::{AuditRun, DeviceOutcome, HistorySource, InventoryLookup, RunSummary, TaskSink};
pub use render::{render, report_digest, DeviceFindings};
