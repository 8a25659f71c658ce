//! Report rendering module.
//!
//! Turns per-agent summaries into the text attached to tracking tasks.

pub mod digest;
pub mod report;

pub use digest::*;
pub use report::*;
