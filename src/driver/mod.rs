//! Frame-loop wiring: resolved layout, cached wire order, transport.
//!
//! The control loop itself lives outside this crate (poll input, draw,
//! send); [`FloorDriver`] owns everything the loop needs per tick. The
//! layout and wire order are computed once at construction and are
//! read-only afterwards.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::canvas::PixelSource;
use crate::config::FloorConfig;
use crate::error::Result;
use crate::frame;
use crate::layout::{self, FloorLayout};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::FloorMetrics;
use crate::transport::{SerialTransport, Transport};
use crate::wire::WireOrder;

const LAYOUT_TARGET: &str = "ledfloor::layout";
const TRANSPORT_TARGET: &str = "ledfloor::transport";

/// Optional observability hooks for the driver.
#[derive(Clone, Default)]
pub struct DriverConfig {
    /// Structured logger for collisions and transport faults.
    pub logger: Option<Logger>,
    /// Shared metrics accumulator, sampled by whoever reports snapshots.
    pub metrics: Option<Arc<Mutex<FloorMetrics>>>,
}

/// Owns the resolved floor and the serial link, and turns one painted
/// surface into one transmitted frame per call.
pub struct FloorDriver {
    layout: Arc<FloorLayout>,
    order: Arc<WireOrder>,
    transport: Box<dyn Transport>,
    config: DriverConfig,
}

impl FloorDriver {
    /// Resolve the configured floor and open its serial device. An open
    /// failure is fatal; collisions are logged and resolution carries on.
    pub fn from_config(config: &FloorConfig, driver_config: DriverConfig) -> Result<Self> {
        let transport = SerialTransport::open(
            &config.system.tty,
            config.system.baud,
            Duration::from_millis(config.system.timeout_ms),
        )?;
        Self::with_transport(config, Box::new(transport), driver_config)
    }

    /// Assemble a driver over an already-open transport.
    pub fn with_transport(
        config: &FloorConfig,
        transport: Box<dyn Transport>,
        driver_config: DriverConfig,
    ) -> Result<Self> {
        let resolution = layout::resolve(&config.modules);
        if let Some(logger) = &driver_config.logger {
            for collision in &resolution.collisions {
                let event = event_with_fields(
                    LogLevel::Warn,
                    LAYOUT_TARGET,
                    "overlapping tile assignment",
                    [
                        json_kv("module", collision.module.as_str()),
                        json_kv("x", collision.x),
                        json_kv("y", collision.y),
                        json_kv("previous", collision.previous),
                        json_kv("assigned", collision.assigned),
                    ],
                );
                logger.log_event(event).ok();
            }
        }

        let layout = resolution.layout.rotate(config.effective_rotation());
        let order = WireOrder::extract(&layout)?;

        if let Some(logger) = &driver_config.logger {
            let event = event_with_fields(
                LogLevel::Info,
                LAYOUT_TARGET,
                "floor resolved",
                [
                    json_kv("size_x", layout.size_x()),
                    json_kv("size_y", layout.size_y()),
                    json_kv("pixel_count", layout.pixel_count()),
                    json_kv("rotation", config.effective_rotation()),
                ],
            );
            logger.log_event(event).ok();
        }

        Ok(Self {
            layout: Arc::new(layout),
            order: Arc::new(order),
            transport,
            config: driver_config,
        })
    }

    pub fn layout(&self) -> &FloorLayout {
        &self.layout
    }

    pub fn wire_order(&self) -> &WireOrder {
        &self.order
    }

    /// Floor size as (size_x, size_y), after rotation. The size a canvas
    /// should be created at.
    pub fn floor_size(&self) -> (u32, u32) {
        (self.layout.size_x(), self.layout.size_y())
    }

    /// Encode the surface and transmit it as one frame.
    ///
    /// A transport fault is logged, counted, and returned; the caller's
    /// loop is expected to continue with the next frame, since a dropped
    /// frame beats a frozen installation.
    pub fn send_frame<S: PixelSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let buffer = frame::encode(source, &self.order);
        let substituted = self
            .order
            .iter()
            .filter(|&(x, y)| x >= source.width() || y >= source.height())
            .count();

        match self.transport.send(&buffer) {
            Ok(()) => {
                if let Some(metrics) = &self.config.metrics {
                    metrics
                        .lock()
                        .expect("metrics mutex poisoned")
                        .record_frame(buffer.len(), substituted);
                }
                Ok(())
            }
            Err(err) => {
                if let Some(metrics) = &self.config.metrics {
                    metrics
                        .lock()
                        .expect("metrics mutex poisoned")
                        .record_write_failure();
                }
                if let Some(logger) = &self.config.logger {
                    let event = event_with_fields(
                        LogLevel::Error,
                        TRANSPORT_TARGET,
                        "frame write failed",
                        [
                            json_kv("error", err.to_string()),
                            json_kv("frame_bytes", buffer.len()),
                        ],
                    );
                    logger.log_event(event).ok();
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{FloorCanvas, Rgb};
    use crate::config::{ModuleConfig, SystemConfig};
    use crate::layout::Orientation;
    use crate::logging::{LogEvent, LogSink, LoggingResult};
    use crate::transport::{MemoryTransport, TransportError, TransportResult};
    use std::collections::BTreeMap;

    fn floor_config(rotation: i64, modules: BTreeMap<String, ModuleConfig>) -> FloorConfig {
        FloorConfig {
            system: SystemConfig {
                tty: "/dev/ttyUSB0".to_string(),
                baud: 115_200,
                timeout_ms: 1000,
                floor_rotation: rotation,
            },
            modules,
        }
    }

    fn two_by_two(orientation: Orientation, x_position: u32, y_position: u32) -> ModuleConfig {
        ModuleConfig {
            orientation,
            width: 2,
            height: 2,
            x_position,
            y_position,
        }
    }

    #[derive(Clone, Default)]
    struct VecSink {
        events: Arc<Mutex<Vec<LogEvent>>>,
    }

    impl LogSink for VecSink {
        fn log(&self, event: &LogEvent) -> LoggingResult<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send(&mut self, _frame: &[u8]) -> TransportResult<()> {
            Err(TransportError::Write(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "write timed out",
            )))
        }
    }

    #[test]
    fn sends_full_frames_through_the_transport() {
        let mut modules = BTreeMap::new();
        modules.insert("a".to_string(), two_by_two(Orientation::North, 0, 0));
        let config = floor_config(0, modules);

        let captured = Arc::new(Mutex::new(MemoryTransport::new()));
        let mut driver = FloorDriver::with_transport(
            &config,
            Box::new(Arc::clone(&captured)),
            DriverConfig::default(),
        )
        .unwrap();

        let mut canvas = FloorCanvas::new(2, 2);
        canvas.set_pixel(0, 0, Rgb::new(10, 20, 30));
        driver.send_frame(&canvas).unwrap();

        let captured = captured.lock().unwrap();
        let frame = captured.last_frame().unwrap();
        assert_eq!(frame.len(), 13);
        assert_eq!(&frame[0..3], &[10, 20, 30]);
        assert_eq!(frame.last(), Some(&1));
    }

    #[test]
    fn rotation_from_config_swaps_floor_size() {
        let mut modules = BTreeMap::new();
        modules.insert(
            "wide".to_string(),
            ModuleConfig {
                orientation: Orientation::North,
                width: 4,
                height: 2,
                x_position: 0,
                y_position: 0,
            },
        );
        let config = floor_config(1, modules);
        let driver = FloorDriver::with_transport(
            &config,
            Box::new(MemoryTransport::new()),
            DriverConfig::default(),
        )
        .unwrap();
        assert_eq!(driver.floor_size(), (2, 4));
    }

    #[test]
    fn collisions_are_logged_before_extraction_fails() {
        let mut modules = BTreeMap::new();
        modules.insert("a".to_string(), two_by_two(Orientation::North, 0, 0));
        modules.insert("b".to_string(), two_by_two(Orientation::North, 1, 0));
        let config = floor_config(0, modules);

        let sink = VecSink::default();
        let events = Arc::clone(&sink.events);
        let driver_config = DriverConfig {
            logger: Some(Logger::new(sink)),
            metrics: None,
        };
        // The overwritten cells swallow indices 1 and 3, so wire-order
        // extraction fails after each collision has been logged.
        let result = FloorDriver::with_transport(
            &config,
            Box::new(MemoryTransport::new()),
            driver_config,
        );
        assert!(result.is_err());

        let events = events.lock().unwrap();
        let overlaps: Vec<_> = events
            .iter()
            .filter(|e| e.message == "overlapping tile assignment")
            .collect();
        assert_eq!(overlaps.len(), 2);
        assert_eq!(overlaps[0].fields["module"], "b");
    }

    #[test]
    fn write_failure_is_reported_and_counted() {
        let mut modules = BTreeMap::new();
        modules.insert("a".to_string(), two_by_two(Orientation::North, 0, 0));
        let config = floor_config(0, modules);

        let metrics = Arc::new(Mutex::new(FloorMetrics::new()));
        let sink = VecSink::default();
        let events = Arc::clone(&sink.events);
        let driver_config = DriverConfig {
            logger: Some(Logger::new(sink)),
            metrics: Some(Arc::clone(&metrics)),
        };
        let mut driver =
            FloorDriver::with_transport(&config, Box::new(FailingTransport), driver_config)
                .unwrap();

        let canvas = FloorCanvas::new(2, 2);
        assert!(driver.send_frame(&canvas).is_err());
        // The next frame is attempted fresh; the driver stays usable.
        assert!(driver.send_frame(&canvas).is_err());

        let snapshot = metrics.lock().unwrap().snapshot(Duration::from_secs(1));
        assert_eq!(snapshot.write_failures, 2);
        assert_eq!(snapshot.frames, 0);

        let events = events.lock().unwrap();
        assert!(events.iter().any(|e| e.message == "frame write failed"));
    }

    #[test]
    fn undersized_surface_counts_substituted_pixels() {
        let mut modules = BTreeMap::new();
        modules.insert("a".to_string(), two_by_two(Orientation::North, 0, 0));
        let config = floor_config(0, modules);

        let metrics = Arc::new(Mutex::new(FloorMetrics::new()));
        let driver_config = DriverConfig {
            logger: None,
            metrics: Some(Arc::clone(&metrics)),
        };
        let mut driver = FloorDriver::with_transport(
            &config,
            Box::new(MemoryTransport::new()),
            driver_config,
        )
        .unwrap();

        let canvas = FloorCanvas::new(1, 1);
        driver.send_frame(&canvas).unwrap();

        let snapshot = metrics.lock().unwrap().snapshot(Duration::from_secs(1));
        assert_eq!(snapshot.frames, 1);
        assert_eq!(snapshot.bytes, 13);
        assert_eq!(snapshot.substituted_pixels, 3);
    }
}
