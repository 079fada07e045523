//! Wire-order module orchestrator.
//!
//! The canonical transmission order derived from a resolved layout.
//! Implementation lives in the private `core` module.

mod core;

pub use core::WireOrder;
