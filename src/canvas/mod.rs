//! Canvas module orchestrator.
//!
//! The drawing surface client code paints each frame into, and the
//! read-only [`PixelSource`] view of it the encoder consumes.
//! Implementation lives in the private `core` module.

mod core;

pub use core::{FloorCanvas, PixelSource, Rgb};
