use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    encode::ffmpeg::VideoConfig,
    foundation::error::{SlidecastError, SlidecastResult},
    layout::{canvas::CanvasSpec, engine::LayoutPolicy},
    render::fonts::FontPreferences,
};

/// Everything adjustable about slide rendering and video assembly.
///
/// Every section is optional in JSON; missing sections take their defaults.
///
/// ```json
/// {
///   "canvas": { "width": 1920, "height": 1080, "accent": "#4fc3f7" },
///   "layout": { "mode": "wrapped", "max_chars": 40 },
///   "fonts": { "title": { "family": "Inter", "weight": 700 }, "font_dirs": ["fonts"] },
///   "video": { "fps": 24, "seconds_per_slide": 5.0 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidecastConfig {
    /// Canvas geometry and palette.
    pub canvas: CanvasSpec,
    /// Layout policy.
    pub layout: LayoutPolicy,
    /// Preferred fonts and font directories.
    pub fonts: FontPreferences,
    /// Slideshow timing.
    pub video: VideoConfig,
}

impl SlidecastConfig {
    /// Parse a JSON config string.
    pub fn from_json_str(s: &str) -> SlidecastResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| SlidecastError::serde(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> SlidecastResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            SlidecastError::serde(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    /// Validate every section.
    pub fn validate(&self) -> SlidecastResult<()> {
        self.canvas.validate()?;
        self.layout.validate()?;
        self.video.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
