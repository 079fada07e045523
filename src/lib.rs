//! Driver core for a serial-attached LED dance floor.
//!
//! Client code draws into a [`FloorCanvas`] using logical (x, y)
//! coordinates. This crate resolves an arbitrary arrangement of wired
//! tile modules into the linear order pixels must be transmitted in,
//! applies the whole-floor rotation, and encodes each finished frame
//! into the exact byte stream the floor hardware expects on its shared
//! serial link.

pub mod canvas;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod transport;
pub mod wire;

pub use canvas::{FloorCanvas, PixelSource, Rgb};
pub use config::{ConfigError, ConfigResult, FloorConfig, ModuleConfig, SystemConfig};
pub use driver::{DriverConfig, FloorDriver};
pub use error::{FloorError, Result};
pub use frame::{SYNC_BYTE, encode};
pub use layout::{Collision, FloorLayout, Orientation, Resolution, resolve};
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, event_with_fields,
    json_kv,
};
pub use metrics::{FloorMetrics, MetricSnapshot};
pub use transport::{MemoryTransport, SerialTransport, Transport, TransportError, TransportResult};
pub use wire::WireOrder;
