//! A single backup attempt and its verification outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the backup transfer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteStatus {
    Success,
    Failure,
}

impl RemoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteStatus::Success => "success",
            RemoteStatus::Failure => "failure",
        }
    }
}

/// Outcome of checking that a backup is restorable on the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalVerificationStatus {
    Success,
    Failure,
    /// The provider did not run or report local verification for the event.
    Unavailable,
}

impl LocalVerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalVerificationStatus::Success => "success",
            LocalVerificationStatus::Failure => "failure",
            LocalVerificationStatus::Unavailable => "unavailable",
        }
    }

    /// True when verification actually ran, whatever its result.
    pub fn is_outcome(&self) -> bool {
        !matches!(self, LocalVerificationStatus::Unavailable)
    }
}

/// One entry of local verification error detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationError {
    /// Category reported by the provider, when it gave one.
    pub error_type: Option<String>,
    pub message: String,
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_type {
            Some(error_type) => write!(f, "{}: {}", error_type, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// One scheduled backup attempt for one agent.
///
/// `remote_error_message` is expected iff the transfer failed, and
/// `local_verification_errors` iff local verification failed. The
/// classifier rejects events that break either rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEvent {
    pub timestamp: DateTime<Utc>,
    pub remote_status: RemoteStatus,
    pub remote_error_message: Option<String>,
    pub local_verification_status: LocalVerificationStatus,
    pub local_verification_errors: Option<Vec<VerificationError>>,
    pub screenshot_reference: Option<String>,
}

impl BackupEvent {
    /// A successful transfer with no local verification reported.
    pub fn success(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            remote_status: RemoteStatus::Success,
            remote_error_message: None,
            local_verification_status: LocalVerificationStatus::Unavailable,
            local_verification_errors: None,
            screenshot_reference: None,
        }
    }

    /// A failed transfer carrying the provider's error message.
    pub fn remote_failure(timestamp: DateTime<Utc>, message: &str) -> Self {
        Self {
            remote_status: RemoteStatus::Failure,
            remote_error_message: Some(message.to_string()),
            ..Self::success(timestamp)
        }
    }

    pub fn with_local_verification(
        mut self,
        status: LocalVerificationStatus,
        errors: Option<Vec<VerificationError>>,
    ) -> Self {
        self.local_verification_status = status;
        self.local_verification_errors = errors;
        self
    }

    pub fn with_screenshot(mut self, reference: &str) -> Self {
        self.screenshot_reference = Some(reference.to_string());
        self
    }
}
