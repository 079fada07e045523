use std::io::Write;
use std::time::Duration;

use serialport::SerialPort;

use super::{Transport, TransportError, TransportResult};

/// The physical serial link shared by every tile on the floor.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open the serial device with the configured baud rate and write
    /// timeout.
    pub fn open(path: &str, baud: u32, timeout: Duration) -> TransportResult<Self> {
        let port = serialport::new(path, baud)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_string(),
                source,
            })?;
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, frame: &[u8]) -> TransportResult<()> {
        self.port.write_all(frame)?;
        self.port.flush()?;
        Ok(())
    }
}
