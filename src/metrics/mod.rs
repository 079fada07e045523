use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Frame-loop counters, accumulated by the driver and emitted
/// periodically as a structured snapshot.
#[derive(Debug, Default, Clone)]
pub struct FloorMetrics {
    frames: u64,
    bytes: u64,
    write_failures: u64,
    substituted_pixels: u64,
}

impl FloorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, bytes: usize, substituted: usize) {
        self.frames = self.frames.saturating_add(1);
        self.bytes = self.bytes.saturating_add(bytes as u64);
        self.substituted_pixels = self.substituted_pixels.saturating_add(substituted as u64);
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures = self.write_failures.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            frames: self.frames,
            bytes: self.bytes,
            write_failures: self.write_failures,
            substituted_pixels: self.substituted_pixels,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub frames: u64,
    pub bytes: u64,
    pub write_failures: u64,
    /// Wire-order coordinates that fell outside the surface and were
    /// sent as black.
    pub substituted_pixels: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        let mut fields = LogFields::new();
        fields.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        fields.insert("frames".to_string(), json!(self.frames));
        fields.insert("bytes".to_string(), json!(self.bytes));
        fields.insert("write_failures".to_string(), json!(self.write_failures));
        fields.insert(
            "substituted_pixels".to_string(),
            json!(self.substituted_pixels),
        );
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "floor_metrics".to_string(),
            fields,
        )
    }
}
