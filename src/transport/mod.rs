//! Transport module orchestrator.
//!
//! Byte-stream sinks completed frames are written to: the physical
//! serial link in production, an in-memory capture in tests and benches.

mod memory;
mod serial;

pub use memory::MemoryTransport;
pub use serial::SerialTransport;

use thiserror::Error;

pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Failing to open the device is fatal at startup.
    #[error("failed to open serial device `{path}`: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },
    /// A failed or timed-out frame write. Non-fatal: the display loop
    /// reports it and carries on with the next frame.
    #[error("frame write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Sink for completed frames.
///
/// One `send` per frame, and the whole buffer must reach the wire in a
/// single write call: the hardware cannot recover from a partial frame.
pub trait Transport {
    fn send(&mut self, frame: &[u8]) -> TransportResult<()>;
}

/// Shared handle to a transport, for callers that need to keep a view of
/// it after handing ownership to the driver.
impl<T: Transport> Transport for std::sync::Arc<std::sync::Mutex<T>> {
    fn send(&mut self, frame: &[u8]) -> TransportResult<()> {
        self.lock().expect("transport mutex poisoned").send(frame)
    }
}
