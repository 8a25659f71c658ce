//! Structured logging with run context.
//!
//! Log lines carry the run id and the audited appliance so one device's
//! audit can be followed through a whole run.

pub mod structured;

pub use structured::*;

/// Initialize the process-wide logger.
///
/// Safe to call more than once; later calls are no-ops. `RUST_LOG`
/// still overrides the default level.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
