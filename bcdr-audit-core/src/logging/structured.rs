//! Structured logging utilities.
//!
//! Every log line is prefixed with the run id and, once a device is being
//! audited, its appliance name: `[run=run-1a2b3c4d] [device=FS01] EVENT k=v`.

use std::fmt;

/// Logging context for an audit run.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    pub device: Option<String>,
}

impl LogContext {
    pub fn new(run_id: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            device: None,
        }
    }

    pub fn with_device(&self, appliance: &str) -> Self {
        Self {
            run_id: self.run_id.clone(),
            device: Some(appliance.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.device {
            Some(device) => write!(f, "[run={}] [device={}]", self.run_id, device),
            None => write!(f, "[run={}]", self.run_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("run-1234abcd");
        assert_eq!(format!("{}", ctx), "[run=run-1234abcd]");

        let ctx_with_device = ctx.with_device("KSGSPBCS02");
        assert_eq!(
            format!("{}", ctx_with_device),
            "[run=run-1234abcd] [device=KSGSPBCS02]"
        );
    }
}
