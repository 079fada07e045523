//! Layout module orchestrator.
//!
//! Translates the configured arrangement of physical tile modules into a
//! mapping from logical floor coordinates to wire indices. Downstream
//! code imports layout types from here while the implementation lives in
//! the private `core` module.

mod core;

pub use core::{Collision, FloorLayout, Orientation, Resolution, resolve};
