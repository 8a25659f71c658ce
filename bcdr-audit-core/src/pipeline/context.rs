//! Run context management.
//!
//! Provides run and device context for logging and state tracking.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::logging::structured::LogContext;

/// Context for one audit run over a roster.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: format!("run-{}", &Uuid::new_v4().simple().to_string()[..8]),
            started_at: Utc::now(),
        }
    }

    /// Wall-clock time since the run started.
    pub fn elapsed(&self) -> Duration {
        Utc::now() - self.started_at
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.run_id)
    }

    /// Logging context for one device within this run.
    pub fn device_context(&self, appliance: &str) -> LogContext {
        self.log_context().with_device(appliance)
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
