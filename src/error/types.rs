use thiserror::Error;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Unified result type for the floor driver crate.
pub type Result<T> = std::result::Result<T, FloorError>;

/// Errors surfaced by the floor driver.
///
/// Tile collisions are deliberately absent: resolution reports them as
/// [`crate::layout::Collision`] findings and carries on, so a
/// misconfigured floor renders wrong rather than refusing to start.
#[derive(Debug, Error)]
pub enum FloorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("wire index {index} has no mapped cell (pixel count {pixel_count})")]
    WireOrderGap { index: u32, pixel_count: u32 },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
