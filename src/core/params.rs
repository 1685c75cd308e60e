use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{ResizeFilter, Rotation};

pub const DEFAULT_INTERVAL_MS: u64 = 4000;
pub const DEFAULT_ROTATION: Rotation = Rotation::Deg270;
pub const DEFAULT_TARGET_SIZE: u32 = 280;
pub const DEFAULT_THRESHOLD: u8 = 128;
pub const DEFAULT_SIZE_CAP_BYTES: usize = 25_000;
pub const DEFAULT_TEARDOWN_VALUE: u8 = 0;

/// Pipeline parameters suitable for config files and CLI overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum spacing between admitted frames
    pub interval_ms: u64,
    pub rotation: Rotation,
    /// Display raster the frame is scaled to; aspect ratio is not preserved
    pub target_width: u32,
    pub target_height: u32,
    /// Luma strictly above this value becomes white
    pub threshold: u8,
    pub resize_filter: ResizeFilter,
    /// Hard cap on the theoretical 1bpp raster size
    pub size_cap_bytes: usize,
    /// Value carried by the teardown message sent on shutdown
    pub teardown_value: u8,
    /// Write each accepted bitmap to a scoped temp directory
    pub diagnostics: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            rotation: DEFAULT_ROTATION,
            target_width: DEFAULT_TARGET_SIZE,
            target_height: DEFAULT_TARGET_SIZE,
            threshold: DEFAULT_THRESHOLD,
            resize_filter: ResizeFilter::Bilinear,
            size_cap_bytes: DEFAULT_SIZE_CAP_BYTES,
            teardown_value: DEFAULT_TEARDOWN_VALUE,
            diagnostics: false,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 {
            return Err(Error::InvalidConfig {
                field: "target_width",
                value: self.target_width.to_string(),
            });
        }
        if self.target_height == 0 {
            return Err(Error::InvalidConfig {
                field: "target_height",
                value: self.target_height.to_string(),
            });
        }
        if self.interval_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "interval_ms",
                value: self.interval_ms.to_string(),
            });
        }
        if self.size_cap_bytes == 0 {
            return Err(Error::InvalidConfig {
                field: "size_cap_bytes",
                value: self.size_cap_bytes.to_string(),
            });
        }
        Ok(())
    }

    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_display_constants() {
        let config = PipelineConfig::default();
        assert_eq!(config.interval_ms, 4000);
        assert_eq!(config.rotation, Rotation::Deg270);
        assert_eq!((config.target_width, config.target_height), (280, 280));
        assert_eq!(config.threshold, 128);
        assert_eq!(config.size_cap_bytes, 25_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "threshold": 90, "rotation": "deg90" }"#).unwrap();
        assert_eq!(config.threshold, 90);
        assert_eq!(config.rotation, Rotation::Deg90);
        assert_eq!(config.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn zero_target_is_rejected() {
        let config = PipelineConfig {
            target_width: 0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig { field: "target_width", .. })
        ));
    }
}
