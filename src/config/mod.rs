//! Configuration module orchestrator.
//!
//! Typed, validated description of the physical floor: the serial link
//! parameters and one entry per tile module. Implementation lives in the
//! private `core` module.

mod core;

pub use core::{ConfigError, ConfigResult, FloorConfig, ModuleConfig, SystemConfig};
