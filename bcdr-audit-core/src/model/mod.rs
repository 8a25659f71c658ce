//! Backup event model.
//!
//! Normalized shapes for appliances, monitored agents and their backup
//! history. Provider payloads are decoded into these types by `provider`.

pub mod device;
pub mod event;

pub use device::*;
pub use event::*;
