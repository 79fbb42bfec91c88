//! Renderer configuration.
//!
//! Loaded from YAML. Every field is optional:
//!
//! ```yaml
//! backend: cpu            # auto | cpu | wgpu
//! output_color_space: device_rgb
//! origin: bottom_left
//! frame_rate: 60
//! initial:
//!   hue: 0.0
//!   saturation: 1.0
//!   brightness: 0.0
//! ```

use std::path::Path;
use std::time::Duration;

use hsb_compute::Backend;
use hsb_core::{ColorSpace, Origin};
use hsb_ops::HsbParameters;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Default tick rate.
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// Render loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Compute backend for the pipeline.
    pub backend: Backend,
    /// Color space drawables are written in.
    pub output_color_space: ColorSpace,
    /// Declared origin of the source asset.
    pub origin: Origin,
    /// Parameters before the first slider event.
    pub initial: HsbParameters,
    /// Ticks per second.
    pub frame_rate: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Cpu,
            output_color_space: ColorSpace::DeviceRgb,
            origin: Origin::BottomLeft,
            initial: HsbParameters::identity(),
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl RenderConfig {
    /// Parses and validates YAML.
    pub fn from_yaml_str(yaml: &str) -> RenderResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), backend = config.backend.name(), "config loaded");
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> RenderResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> RenderResult<()> {
        if self.frame_rate == 0 {
            return Err(RenderError::Config("frame_rate must be > 0".into()));
        }
        if let Err(e) = self.initial.validate() {
            return Err(RenderError::Config(format!("initial parameters: {e}")));
        }
        Ok(())
    }

    /// Time between ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}
