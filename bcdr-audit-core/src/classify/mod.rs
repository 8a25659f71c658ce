//! Alert classification module.
//!
//! Splits backup history into two failure classes:
//! - Remote backup failures (the transfer failed)
//! - Local verification failures (transfer succeeded, restore check failed)

pub mod classifier;

pub use classifier::*;
