//! Incident text rendering.
//!
//! Output is line-oriented and fully determined by its input, so re-runs
//! over the same history produce byte-identical task text.

use std::fmt::Write as _;

use crate::aggregate::{failing_agents, CategoryErrors, PerAgentSummary};
use crate::model::AuditedDevice;

pub const SEPARATOR: &str = "_______________________________________";
pub const RECORD_DELIMITER: &str = "---------------------------------------";
pub const NOT_CHECKED: &str = "Not Checked";
pub const NO_ERRORS: &str = "No backup errors found";
pub const NOT_APPLICABLE: &str = "NA";
pub const NO_SCREENSHOT: &str = "None";

/// What the audit learned about a device.
#[derive(Debug, Clone, Copy)]
pub enum DeviceFindings<'a> {
    /// History was never retrieved or classified.
    NotChecked,
    Checked(&'a [PerAgentSummary]),
}

/// The two failure categories of an agent report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Backup,
    Local,
}

impl FailureCategory {
    pub fn heading(&self) -> &'static str {
        match self {
            FailureCategory::Backup => "BACKUP ERRORS:",
            FailureCategory::Local => "LOCAL ERRORS:",
        }
    }

    fn errors<'a>(&self, summary: &'a PerAgentSummary) -> &'a CategoryErrors {
        match self {
            FailureCategory::Backup => &summary.backup_errors,
            FailureCategory::Local => &summary.local_errors,
        }
    }
}

/// Render the incident text for one device.
pub fn render(device: &AuditedDevice, findings: DeviceFindings<'_>) -> String {
    let mut out = String::new();

    push_line(&mut out, &format!("Client: {}", device.client));
    push_line(&mut out, &format!("Service: {}", device.provider));
    push_line(&mut out, &format!("Appliance: {}", device.appliance));
    push_line(&mut out, &format!("Notes: {}", device.notes));
    push_line(&mut out, SEPARATOR);

    let summaries = match findings {
        DeviceFindings::Checked(summaries) if !summaries.is_empty() => summaries,
        _ => {
            push_line(&mut out, NOT_CHECKED);
            return out;
        }
    };

    let failing = failing_agents(summaries);
    if failing.is_empty() {
        push_line(&mut out, NO_ERRORS);
        return out;
    }

    for summary in failing {
        push_line(&mut out, &format!("Agent Name: {}", summary.agent));
        for category in [FailureCategory::Backup, FailureCategory::Local] {
            render_category(&mut out, category, category.errors(summary));
        }
    }

    out
}

fn render_category(out: &mut String, category: FailureCategory, errors: &CategoryErrors) {
    push_line(out, category.heading());

    match errors {
        CategoryErrors::NotApplicable => push_line(out, NOT_APPLICABLE),
        CategoryErrors::NoErrors => push_line(out, NO_ERRORS),
        CategoryErrors::Errors(records) => {
            for record in records {
                let _ = writeln!(out, "Timestamp: {}", record.timestamp.to_rfc3339());
                let _ = writeln!(out, "Status: {}", record.status);
                let _ = writeln!(out, "Error: {}", record.error);
                let _ = writeln!(
                    out,
                    "Screenshot: {}",
                    record.screenshot.as_deref().unwrap_or(NO_SCREENSHOT)
                );
                push_line(out, RECORD_DELIMITER);
            }
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
