//! Run aggregation module.
//!
//! Decides whether a classified device warrants an incident and builds
//! the per-agent summaries handed to the renderer.

pub mod summary;

pub use summary::*;
