//! Pipeline orchestration module.
//!
//! Audit run that coordinates, per device:
//! - Serial resolution
//! - History retrieval
//! - Alert classification
//! - Aggregation
//! - Rendering and task creation

pub mod audit;
pub mod collaborators;
pub mod context;

pub use audit::*;
pub use collaborators::*;
pub use context::*;
