use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::Orientation;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading the floor configuration. All of these are
/// fatal: a malformed config fails fast with enough detail to fix the
/// file, rather than being silently tolerated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("module `{module}`: {reason}")]
    InvalidModule { module: String, reason: String },
}

/// Serial link parameters plus the whole-floor rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0`.
    pub tty: String,
    pub baud: u32,
    /// Write timeout for one frame, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Quarter turns the physical floor is rotated relative to the
    /// logical coordinate system. Any integer; effective value is mod 4.
    #[serde(default)]
    pub floor_rotation: i64,
}

fn default_timeout_ms() -> u64 {
    1000
}

/// One physical tile module: its mounting orientation, its own
/// (pre-rotation) width and height, and where its origin sits on the
/// floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub x_position: u32,
    pub y_position: u32,
}

/// Root configuration, loaded once at startup and immutable thereafter.
/// Module names double as the deterministic processing order, so the map
/// is a `BTreeMap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorConfig {
    pub system: SystemConfig,
    pub modules: BTreeMap<String, ModuleConfig>,
}

impl FloorConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        for (name, module) in &self.modules {
            if module.width == 0 || module.height == 0 {
                return Err(ConfigError::InvalidModule {
                    module: name.clone(),
                    reason: format!(
                        "width and height must be positive, got {}x{}",
                        module.width, module.height
                    ),
                });
            }
        }
        Ok(())
    }

    /// Effective rotation in quarter turns, always in `0..4`.
    pub fn effective_rotation(&self) -> u32 {
        self.system.floor_rotation.rem_euclid(4) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "system": { "tty": "/dev/ttyUSB0", "baud": 115200, "floor_rotation": 1 },
        "modules": {
            "left": { "orientation": "N", "width": 6, "height": 8, "x_position": 0, "y_position": 0 },
            "right": { "orientation": "E", "width": 6, "height": 8, "x_position": 6, "y_position": 0 }
        }
    }"#;

    #[test]
    fn parses_a_full_config() {
        let config = FloorConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.system.tty, "/dev/ttyUSB0");
        assert_eq!(config.system.baud, 115_200);
        assert_eq!(config.modules.len(), 2);
        assert_eq!(config.modules["right"].orientation, Orientation::East);
    }

    #[test]
    fn timeout_and_rotation_default_when_absent() {
        let config = FloorConfig::from_json(
            r#"{ "system": { "tty": "/dev/ttyUSB0", "baud": 9600 }, "modules": {} }"#,
        )
        .unwrap();
        assert_eq!(config.system.timeout_ms, 1000);
        assert_eq!(config.system.floor_rotation, 0);
        assert_eq!(config.effective_rotation(), 0);
    }

    #[test]
    fn rotation_wraps_mod_four_including_negatives() {
        let mut config = FloorConfig::from_json(SAMPLE).unwrap();
        config.system.floor_rotation = 6;
        assert_eq!(config.effective_rotation(), 2);
        config.system.floor_rotation = -1;
        assert_eq!(config.effective_rotation(), 3);
    }

    #[test]
    fn unknown_fields_fail_fast() {
        let raw = r#"{
            "system": { "tty": "/dev/ttyUSB0", "baud": 9600, "bade": 9600 },
            "modules": {}
        }"#;
        assert!(matches!(
            FloorConfig::from_json(raw),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unrecognised_orientation_fails_fast() {
        let raw = r#"{
            "system": { "tty": "/dev/ttyUSB0", "baud": 9600 },
            "modules": {
                "odd": { "orientation": "Q", "width": 2, "height": 2, "x_position": 0, "y_position": 0 }
            }
        }"#;
        assert!(matches!(
            FloorConfig::from_json(raw),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_sized_module_is_rejected() {
        let raw = r#"{
            "system": { "tty": "/dev/ttyUSB0", "baud": 9600 },
            "modules": {
                "flat": { "orientation": "N", "width": 0, "height": 2, "x_position": 0, "y_position": 0 }
            }
        }"#;
        match FloorConfig::from_json(raw) {
            Err(ConfigError::InvalidModule { module, .. }) => assert_eq!(module, "flat"),
            other => panic!("expected InvalidModule, got {other:?}"),
        }
    }
}
