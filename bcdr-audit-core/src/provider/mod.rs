//! Provider payload adapters.
//!
//! Pure decoding of the backup provider's JSON shapes. Fetching the
//! payloads is left to the caller's HTTP client.

pub mod history;
pub mod inventory;

pub use history::*;
pub use inventory::*;
