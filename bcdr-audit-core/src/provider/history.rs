//! Asset history decoding.
//!
//! Decodes the provider's per-appliance asset payload (one entry per
//! protected agent, each with its recent backups) into `MonitoredAgent`s.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ProviderPayloadError;
use crate::model::{
    BackupEvent, LocalVerificationStatus, MonitoredAgent, RemoteStatus, VerificationError,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAsset {
    name: String,
    is_paused: Option<bool>,
    is_archived: Option<bool>,
    #[serde(default)]
    backups: Vec<RawBackup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBackup {
    timestamp: String,
    backup: RawTransfer,
    local_verification: Option<RawLocalVerification>,
    advanced_verification: Option<RawAdvancedVerification>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLocalVerification {
    status: Option<String>,
    errors: Option<Vec<RawVerificationError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerificationError {
    error_type: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAdvancedVerification {
    screenshot_verification: Option<RawScreenshot>,
}

#[derive(Debug, Deserialize)]
struct RawScreenshot {
    image: Option<String>,
}

/// Decode an asset history payload.
///
/// Missing paused/archived flags read as false. A missing
/// `localVerification` block, or one without a status, reads as
/// `Unavailable`. Events come back sorted oldest first.
pub fn decode_assets(payload: &str) -> Result<Vec<MonitoredAgent>, ProviderPayloadError> {
    let raw: Vec<RawAsset> = serde_json::from_str(payload)?;
    raw.into_iter().map(convert_asset).collect()
}

fn convert_asset(asset: RawAsset) -> Result<MonitoredAgent, ProviderPayloadError> {
    let mut events = asset
        .backups
        .into_iter()
        .map(|b| convert_backup(&asset.name, b))
        .collect::<Result<Vec<_>, _>>()?;
    events.sort_by_key(|e| e.timestamp);

    Ok(MonitoredAgent {
        name: asset.name,
        is_paused: asset.is_paused.unwrap_or(false),
        is_archived: asset.is_archived.unwrap_or(false),
        events,
    })
}

fn convert_backup(agent: &str, raw: RawBackup) -> Result<BackupEvent, ProviderPayloadError> {
    let timestamp = DateTime::parse_from_rfc3339(&raw.timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| ProviderPayloadError::Timestamp {
            agent: agent.to_string(),
            value: raw.timestamp.clone(),
            source,
        })?;

    let remote_status = match raw.backup.status.as_str() {
        "success" => RemoteStatus::Success,
        "failure" => RemoteStatus::Failure,
        other => {
            return Err(ProviderPayloadError::UnknownStatus {
                agent: agent.to_string(),
                field: "backup",
                value: other.to_string(),
            })
        }
    };

    let (local_verification_status, local_verification_errors) = match raw.local_verification {
        Some(RawLocalVerification {
            status: Some(status),
            errors,
        }) => {
            let status = match status.as_str() {
                "success" => LocalVerificationStatus::Success,
                "failure" => LocalVerificationStatus::Failure,
                other => {
                    return Err(ProviderPayloadError::UnknownStatus {
                        agent: agent.to_string(),
                        field: "localVerification",
                        value: other.to_string(),
                    })
                }
            };
            (status, errors.map(convert_verification_errors))
        }
        _ => (LocalVerificationStatus::Unavailable, None),
    };

    let screenshot_reference = raw
        .advanced_verification
        .and_then(|a| a.screenshot_verification)
        .and_then(|s| s.image);

    Ok(BackupEvent {
        timestamp,
        remote_status,
        remote_error_message: raw.backup.error_message,
        local_verification_status,
        local_verification_errors,
        screenshot_reference,
    })
}

/// Entries without a message carry no detail and are dropped, so a failure
/// listing only such entries reaches the classifier with no detail at all.
fn convert_verification_errors(raw: Vec<RawVerificationError>) -> Vec<VerificationError> {
    raw.into_iter()
        .filter_map(|e| {
            let message = e.error_message.filter(|m| !m.trim().is_empty())?;
            Some(VerificationError {
                error_type: e.error_type.filter(|t| !t.trim().is_empty()),
                message,
            })
        })
        .collect()
}
