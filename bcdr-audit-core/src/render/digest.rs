//! Report fingerprints.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of rendered report text.
///
/// Identical reports hash identically, which lets a task sink recognise a
/// re-run that found nothing new.
pub fn report_digest(report: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(report.as_bytes());
    hex::encode(hasher.finalize())
}
