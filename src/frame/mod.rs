//! Frame-encoder module orchestrator.
//!
//! Turns a populated pixel surface plus the wire order into the exact
//! outgoing byte stream. Implementation lives in the private `core`
//! module.

mod core;

pub use core::{SYNC_BYTE, encode};
