//! Alert classification.
//!
//! Partitions a device's backup history into remote-backup failures and
//! local-verification failures.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::MalformedEventError;
use crate::logging::structured::LogContext;
use crate::model::{BackupEvent, LocalVerificationStatus, MonitoredAgent, RemoteStatus};

/// One classified failure, in the shape rendered into reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub error: String,
    /// Screenshot image reference, `None` when advanced verification did not run.
    pub screenshot: Option<String>,
}

/// Classification result for one appliance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceAlertReport {
    /// Agent name -> remote backup failures, chronological.
    pub backup_failures: BTreeMap<String, Vec<FailureRecord>>,
    /// Agent name -> local verification failures, chronological.
    pub local_failures: BTreeMap<String, Vec<FailureRecord>>,
    /// Number of agents considered after excluding paused/archived ones.
    pub agents_audited: usize,
    /// Audited agent names in provider order.
    pub audited_agents: Vec<String>,
    /// Agents that reported at least one local verification outcome.
    pub verified_agents: BTreeSet<String>,
}

impl DeviceAlertReport {
    pub fn backup_failures_for(&self, agent: &str) -> &[FailureRecord] {
        self.backup_failures.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn local_failures_for(&self, agent: &str) -> &[FailureRecord] {
        self.local_failures.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any audited agent ever reported a local verification outcome.
    pub fn local_verification_seen(&self) -> bool {
        !self.verified_agents.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.backup_failures.values().map(Vec::len).sum::<usize>()
            + self.local_failures.values().map(Vec::len).sum::<usize>()
    }
}

/// Classify the backup history of every agent on one appliance.
///
/// Paused and archived agents contribute nothing. Local verification is
/// only inspected for events whose transfer succeeded.
pub fn classify(
    agents: &[MonitoredAgent],
    ctx: &LogContext,
) -> Result<DeviceAlertReport, MalformedEventError> {
    let mut report = DeviceAlertReport::default();

    for agent in agents {
        if agent.is_excluded() {
            log::debug!(
                "{} AGENT_SKIPPED agent={} paused={} archived={}",
                ctx,
                agent.name,
                agent.is_paused,
                agent.is_archived
            );
            continue;
        }

        report.agents_audited += 1;
        if !report.audited_agents.contains(&agent.name) {
            report.audited_agents.push(agent.name.clone());
        }

        for event in &agent.events {
            if event.local_verification_status.is_outcome() {
                report.verified_agents.insert(agent.name.clone());
            }

            match classify_event(&agent.name, event)? {
                Some(EventAlert::Backup(record)) => report
                    .backup_failures
                    .entry(agent.name.clone())
                    .or_default()
                    .push(record),
                Some(EventAlert::Local(record)) => report
                    .local_failures
                    .entry(agent.name.clone())
                    .or_default()
                    .push(record),
                None => {}
            }
        }

        log::debug!(
            "{} AGENT_CLASSIFIED agent={} events={} backup_failures={} local_failures={}",
            ctx,
            agent.name,
            agent.events.len(),
            report.backup_failures_for(&agent.name).len(),
            report.local_failures_for(&agent.name).len()
        );
    }

    log::info!(
        "{} DEVICE_CLASSIFIED agents_audited={} failures={} local_verification_seen={}",
        ctx,
        report.agents_audited,
        report.failure_count(),
        report.local_verification_seen()
    );

    Ok(report)
}

enum EventAlert {
    Backup(FailureRecord),
    Local(FailureRecord),
}

fn classify_event(
    agent: &str,
    event: &BackupEvent,
) -> Result<Option<EventAlert>, MalformedEventError> {
    let malformed = |reason: &str| MalformedEventError {
        agent: agent.to_string(),
        timestamp: event.timestamp,
        reason: reason.to_string(),
    };

    if event.remote_status == RemoteStatus::Failure {
        let error = event
            .remote_error_message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| malformed("remote failure without error message"))?;

        return Ok(Some(EventAlert::Backup(FailureRecord {
            timestamp: event.timestamp,
            status: RemoteStatus::Failure.as_str().to_string(),
            error,
            screenshot: event.screenshot_reference.clone(),
        })));
    }

    if event.local_verification_status != LocalVerificationStatus::Failure {
        return Ok(None);
    }

    let details = match &event.local_verification_errors {
        Some(errors) if !errors.is_empty() => errors,
        _ => return Err(malformed("local verification failure without error detail")),
    };

    let error = details
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");

    Ok(Some(EventAlert::Local(FailureRecord {
        timestamp: event.timestamp,
        status: event.local_verification_status.as_str().to_string(),
        error,
        screenshot: event.screenshot_reference.clone(),
    })))
}
