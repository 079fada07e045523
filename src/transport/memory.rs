use super::{Transport, TransportResult};

/// Captures frames in memory in place of the physical link. Used by
/// tests and benches, and handy for inspecting exact wire output.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    frames: Vec<Vec<u8>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[u8]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, frame: &[u8]) -> TransportResult<()> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}
