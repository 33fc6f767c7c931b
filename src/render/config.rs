use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::Color,
    core::Canvas,
    error::{ChartError, ChartResult},
};

/// Per-surface configuration. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Background painted under every frame.
    pub background: Color,
    /// Default animation duration in milliseconds.
    pub duration_ms: u64,
    /// Font file used for all text; without one text is not drawn.
    pub font_path: Option<PathBuf>,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            background: Color::TRANSPARENT,
            duration_ms: 600,
            font_path: None,
        }
    }
}

impl SurfaceConfig {
    /// Maximum supported width or height.
    pub const MAX_SIDE: u32 = u16::MAX as u32;

    /// Check sizes and color components.
    pub fn validate(&self) -> ChartResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::precondition(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE {
            return Err(ChartError::validation(format!(
                "surface size {}x{} exceeds {}",
                self.width,
                self.height,
                Self::MAX_SIDE
            )));
        }
        let c = self.background;
        if ![c.r, c.g, c.b, c.a].iter().all(|v| v.is_finite()) {
            return Err(ChartError::validation("background color must be finite"));
        }
        Ok(())
    }

    /// Canvas size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Default animation duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
