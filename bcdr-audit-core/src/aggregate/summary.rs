//! Per-agent summaries and the reportability decision.

use serde::{Deserialize, Serialize};

use crate::classify::{DeviceAlertReport, FailureRecord};

/// Findings for one failure category of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CategoryErrors {
    /// The check was never performed (no local verification offered).
    NotApplicable,
    NoErrors,
    Errors(Vec<FailureRecord>),
}

impl CategoryErrors {
    fn from_records(records: &[FailureRecord]) -> Self {
        if records.is_empty() {
            CategoryErrors::NoErrors
        } else {
            CategoryErrors::Errors(records.to_vec())
        }
    }

    pub fn has_errors(&self) -> bool {
        matches!(self, CategoryErrors::Errors(_))
    }

    pub fn records(&self) -> &[FailureRecord] {
        match self {
            CategoryErrors::Errors(records) => records.as_slice(),
            _ => &[],
        }
    }
}

/// How far "local verification never ran" reaches when summarizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalVerificationScope {
    /// Local errors are `NotApplicable` only when no agent on the device
    /// produced a verification outcome.
    #[default]
    PerDevice,
    /// Each agent is judged on its own verification history.
    PerAgent,
}

impl LocalVerificationScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalVerificationScope::PerDevice => "per_device",
            LocalVerificationScope::PerAgent => "per_agent",
        }
    }
}

/// Summary of one audited agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerAgentSummary {
    pub agent: String,
    pub backup_errors: CategoryErrors,
    pub local_errors: CategoryErrors,
}

impl PerAgentSummary {
    /// True when at least one category holds real failures.
    pub fn has_failures(&self) -> bool {
        self.backup_errors.has_errors() || self.local_errors.has_errors()
    }
}

/// A device is reportable iff some agent has at least one failure record.
pub fn is_reportable(report: &DeviceAlertReport) -> bool {
    report.backup_failures.values().any(|r| !r.is_empty())
        || report.local_failures.values().any(|r| !r.is_empty())
}

/// Summarize every audited agent in provider order.
pub fn summarize(report: &DeviceAlertReport, scope: LocalVerificationScope) -> Vec<PerAgentSummary> {
    report
        .audited_agents
        .iter()
        .map(|agent| {
            let local_applicable = match scope {
                LocalVerificationScope::PerDevice => report.local_verification_seen(),
                LocalVerificationScope::PerAgent => report.verified_agents.contains(agent),
            };

            let local_errors = if local_applicable {
                CategoryErrors::from_records(report.local_failures_for(agent))
            } else {
                CategoryErrors::NotApplicable
            };

            PerAgentSummary {
                agent: agent.clone(),
                backup_errors: CategoryErrors::from_records(report.backup_failures_for(agent)),
                local_errors,
            }
        })
        .collect()
}

/// The device-level failure collection: agents worth an incident.
pub fn failing_agents(summaries: &[PerAgentSummary]) -> Vec<&PerAgentSummary> {
    summaries.iter().filter(|s| s.has_failures()).collect()
}
