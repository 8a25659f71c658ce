//! Audit run orchestration.
//!
//! For each roster entry:
//! 1. Serial resolution (configured, else inventory lookup)
//! 2. History fetch
//! 3. Classification
//! 4. Summaries and reportability
//! 5. Rendering
//! 6. Task creation (reportable devices, unless dry run)
//!
//! A failure on one device is logged and recorded on its outcome; the run
//! always continues with the next device.

use crate::aggregate::{is_reportable, summarize, PerAgentSummary};
use crate::classify::classify;
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::logging::structured::LogContext;
use crate::model::AuditedDevice;
use crate::render::{render, report_digest, DeviceFindings};

use super::collaborators::{HistorySource, InventoryLookup, TaskSink};
use super::context::RunContext;

/// Result of auditing one device. Every roster entry gets exactly one.
#[derive(Debug)]
pub struct DeviceOutcome {
    pub device: AuditedDevice,
    pub serial: Option<String>,
    /// `None` when the device was never checked.
    pub summaries: Option<Vec<PerAgentSummary>>,
    pub reportable: bool,
    pub report: String,
    pub digest: String,
    pub task_id: Option<String>,
    pub error: Option<AuditError>,
}

impl DeviceOutcome {
    pub fn checked(&self) -> bool {
        self.summaries.is_some()
    }
}

/// Result of a whole run.
#[derive(Debug)]
pub struct RunSummary {
    pub run_id: String,
    pub outcomes: Vec<DeviceOutcome>,
}

impl RunSummary {
    pub fn checked_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.checked()).count()
    }

    pub fn reportable_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.reportable).count()
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }

    pub fn tasks_created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.task_id.is_some()).count()
    }
}

/// Audits a roster against injected collaborators.
pub struct AuditRun<'a> {
    config: &'a AuditConfig,
    inventory: &'a dyn InventoryLookup,
    history: &'a dyn HistorySource,
    sink: &'a dyn TaskSink,
}

struct Checked {
    serial: String,
    summaries: Vec<PerAgentSummary>,
    reportable: bool,
}

impl<'a> AuditRun<'a> {
    pub fn new(
        config: &'a AuditConfig,
        inventory: &'a dyn InventoryLookup,
        history: &'a dyn HistorySource,
        sink: &'a dyn TaskSink,
    ) -> Self {
        Self {
            config,
            inventory,
            history,
            sink,
        }
    }

    /// Audit the roster from the configuration.
    pub fn run_configured(&self) -> RunSummary {
        self.run(&self.config.devices)
    }

    pub fn run(&self, roster: &[AuditedDevice]) -> RunSummary {
        let ctx = RunContext::new();
        let run_ctx = ctx.log_context();

        log::info!(
            "{} RUN_START devices={} scope={} dry_run={}",
            run_ctx,
            roster.len(),
            self.config.local_verification_scope.as_str(),
            self.config.dry_run
        );

        let outcomes: Vec<DeviceOutcome> = roster
            .iter()
            .map(|device| self.audit_device(&ctx, device))
            .collect();

        let summary = RunSummary {
            run_id: ctx.run_id.clone(),
            outcomes,
        };

        log::info!(
            "{} RUN_COMPLETE devices={} checked={} reportable={} tasks={} errors={} started_at={} elapsed_ms={}",
            run_ctx,
            roster.len(),
            summary.checked_count(),
            summary.reportable_count(),
            summary.tasks_created(),
            summary.error_count(),
            ctx.started_at.to_rfc3339(),
            ctx.elapsed().num_milliseconds()
        );

        summary
    }

    fn audit_device(&self, run: &RunContext, device: &AuditedDevice) -> DeviceOutcome {
        let ctx = run.device_context(&device.appliance);
        log::debug!("{} DEVICE_AUDIT_START client={}", ctx, device.client);

        let (serial, summaries, reportable, mut error) = match self.check_device(device, &ctx) {
            Ok(checked) => (
                Some(checked.serial),
                Some(checked.summaries),
                checked.reportable,
                None,
            ),
            Err((serial, err)) => {
                match &err {
                    AuditError::NotFound { .. } => {
                        log::warn!("{} DEVICE_NOT_FOUND appliance={}", ctx, device.appliance);
                    }
                    other => {
                        log::error!(
                            "{} DEVICE_AUDIT_FAILED kind={} error={}",
                            ctx,
                            other.kind(),
                            other
                        );
                    }
                }
                (serial, None, false, Some(err))
            }
        };

        let findings = match &summaries {
            Some(summaries) => DeviceFindings::Checked(summaries),
            None => DeviceFindings::NotChecked,
        };
        let report = render(device, findings);
        let digest = report_digest(&report);

        let mut task_id = None;
        if self.wants_task(reportable) {
            match self.sink.create_task(device, &report) {
                Ok(id) => {
                    log::info!("{} TASK_CREATED task_id={} digest={}", ctx, id, digest);
                    task_id = Some(id);
                }
                Err(e) => {
                    let err = AuditError::TaskSink(e);
                    log::error!("{} TASK_CREATE_FAILED error={}", ctx, err);
                    // A sink failure must not hide an earlier audit error.
                    error.get_or_insert(err);
                }
            }
        }

        log::info!(
            "{} DEVICE_AUDIT_COMPLETE checked={} reportable={} task={}",
            ctx,
            summaries.is_some(),
            reportable,
            task_id.is_some()
        );

        DeviceOutcome {
            device: device.clone(),
            serial,
            summaries,
            reportable,
            report,
            digest,
            task_id,
            error,
        }
    }

    fn check_device(
        &self,
        device: &AuditedDevice,
        ctx: &LogContext,
    ) -> Result<Checked, (Option<String>, AuditError)> {
        let serial = self.resolve_serial(device).map_err(|e| (None, e))?;
        log::debug!("{} SERIAL_RESOLVED serial={}", ctx, serial);

        let agents = self
            .history
            .fetch_agents(&serial)
            .map_err(|e| (Some(serial.clone()), AuditError::History(e)))?;

        let report = classify(&agents, ctx).map_err(|e| (Some(serial.clone()), e.into()))?;
        let summaries = summarize(&report, self.config.local_verification_scope);
        let reportable = is_reportable(&report);

        Ok(Checked {
            serial,
            summaries,
            reportable,
        })
    }

    fn resolve_serial(&self, device: &AuditedDevice) -> Result<String, AuditError> {
        if let Some(serial) = &device.serial {
            return Ok(serial.clone());
        }

        self.inventory
            .resolve_serial(&device.appliance)
            .map_err(AuditError::Inventory)?
            .ok_or_else(|| AuditError::NotFound {
                appliance: device.appliance.clone(),
            })
    }

    fn wants_task(&self, reportable: bool) -> bool {
        !self.config.dry_run && (reportable || self.config.create_tasks_for_clean_devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};

    use crate::model::{BackupEvent, MonitoredAgent};
    use crate::provider::InventoryIndex;

    struct FixedHistory(HashMap<String, Vec<MonitoredAgent>>);

    impl HistorySource for FixedHistory {
        fn fetch_agents(&self, serial: &str) -> anyhow::Result<Vec<MonitoredAgent>> {
            self.0
                .get(serial)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP 500 for {}", serial))
        }
    }

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<String>>);

    impl TaskSink for RecordingSink {
        fn create_task(&self, device: &AuditedDevice, _report: &str) -> anyhow::Result<String> {
            let mut posted = self.0.borrow_mut();
            posted.push(device.appliance.clone());
            Ok(format!("T-{}", posted.len()))
        }
    }

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            CAPTURED.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;

    /// Lines logged so far for one run.
    fn captured_for(run_id: &str) -> Vec<String> {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Debug);
        let prefix = format!("[run={}]", run_id);
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn fixtures() -> (InventoryIndex, FixedHistory) {
        let ts = Utc.with_ymd_and_hms(2026, 1, 29, 3, 0, 0).unwrap();
        let mut inventory = InventoryIndex::new();
        inventory.insert("broken", "S-BROKEN");
        inventory.insert("healthy", "S-HEALTHY");
        inventory.insert("offline", "S-OFFLINE");

        let mut history = HashMap::new();
        history.insert(
            "S-BROKEN".to_string(),
            vec![MonitoredAgent::new("FS01", vec![BackupEvent::remote_failure(ts, "disk full")])],
        );
        history.insert(
            "S-HEALTHY".to_string(),
            vec![MonitoredAgent::new("FS02", vec![BackupEvent::success(ts)])],
        );
        (inventory, FixedHistory(history))
    }

    fn roster() -> Vec<AuditedDevice> {
        ["broken", "missing", "offline", "healthy"]
            .iter()
            .map(|name| AuditedDevice::new("Client", "Datto BCDR", name))
            .collect()
    }

    #[test]
    fn test_every_device_gets_one_outcome() {
        let config = AuditConfig::default();
        let (inventory, history) = fixtures();
        let sink = RecordingSink::default();

        let summary = AuditRun::new(&config, &inventory, &history, &sink).run(&roster());

        assert_eq!(summary.outcomes.len(), 4);
        assert_eq!(summary.checked_count(), 2);
        assert_eq!(summary.reportable_count(), 1);
        assert_eq!(summary.error_count(), 2);
        assert_eq!(*sink.0.borrow(), vec!["broken".to_string()]);

        let broken = &summary.outcomes[0];
        assert_eq!(broken.task_id.as_deref(), Some("T-1"));
        assert!(broken.report.contains("Error: disk full"));

        let missing = &summary.outcomes[1];
        assert!(matches!(missing.error, Some(AuditError::NotFound { .. })));
        assert_eq!(missing.serial, None);
        assert!(missing.report.ends_with("Not Checked\n"));

        let offline = &summary.outcomes[2];
        assert!(matches!(offline.error, Some(AuditError::History(_))));
        assert_eq!(offline.serial.as_deref(), Some("S-OFFLINE"));
        assert!(offline.report.ends_with("Not Checked\n"));

        let healthy = &summary.outcomes[3];
        assert!(healthy.error.is_none());
        assert!(healthy.report.ends_with("No backup errors found\n"));
        assert_eq!(healthy.task_id, None);
    }

    #[test]
    fn test_dry_run_skips_sink() {
        let config = AuditConfig {
            dry_run: true,
            ..AuditConfig::default()
        };
        let (inventory, history) = fixtures();
        let sink = RecordingSink::default();

        let summary = AuditRun::new(&config, &inventory, &history, &sink).run(&roster());
        assert_eq!(summary.tasks_created(), 0);
        assert!(sink.0.borrow().is_empty());
        assert_eq!(summary.reportable_count(), 1);
    }

    #[test]
    fn test_clean_devices_ticketed_when_configured() {
        let config = AuditConfig {
            create_tasks_for_clean_devices: true,
            ..AuditConfig::default()
        };
        let (inventory, history) = fixtures();
        let sink = RecordingSink::default();

        let summary = AuditRun::new(&config, &inventory, &history, &sink).run(&roster());
        assert_eq!(summary.tasks_created(), 4);
    }

    #[test]
    fn test_configured_serial_bypasses_inventory() {
        let config = AuditConfig {
            devices: vec![AuditedDevice::new("Client", "Datto BCDR", "renamed").with_serial("S-BROKEN")],
            ..AuditConfig::default()
        };
        let (inventory, history) = fixtures();
        let sink = RecordingSink::default();

        let summary = AuditRun::new(&config, &inventory, &history, &sink).run_configured();
        assert!(summary.outcomes[0].reportable);
        assert_eq!(summary.outcomes[0].serial.as_deref(), Some("S-BROKEN"));
    }

    #[test]
    fn test_run_logs_device_events() {
        // Install before the run so its lines are captured.
        captured_for("none");

        let config = AuditConfig::default();
        let (inventory, history) = fixtures();
        let sink = RecordingSink::default();
        let summary = AuditRun::new(&config, &inventory, &history, &sink).run(&roster());

        let lines = captured_for(&summary.run_id);
        let find = |event: &str| {
            lines
                .iter()
                .find(|line| line.contains(event))
                .cloned()
                .unwrap_or_else(|| panic!("no {} line in {:?}", event, lines))
        };

        assert!(find("RUN_START").ends_with("RUN_START devices=4 scope=per_device dry_run=false"));
        assert!(find("RUN_COMPLETE")
            .contains("RUN_COMPLETE devices=4 checked=2 reportable=1 tasks=1 errors=2 started_at="));
        assert!(find("TASK_CREATED").contains("[device=broken] TASK_CREATED task_id=T-1 digest="));
        assert!(find("DEVICE_NOT_FOUND").ends_with("[device=missing] DEVICE_NOT_FOUND appliance=missing"));
        assert!(find("DEVICE_AUDIT_FAILED")
            .contains("[device=offline] DEVICE_AUDIT_FAILED kind=history error=history fetch failed: HTTP 500 for S-OFFLINE"));
        assert!(find("SERIAL_RESOLVED").contains("serial=S-BROKEN"));
    }
}
