use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Rgba8,
        error::{SlidecastError, SlidecastResult},
    },
    layout::plan::FontRole,
};

/// Fixed geometry and palette shared by the layout engine and the rasterizer.
///
/// Defaults reproduce the classic dark 1280×720 slide: light body text, amber titles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSpec {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Left and top inset of the first glyph row.
    pub margin: f32,
    /// Canvas fill.
    pub background: Rgba8,
    /// Body text colour.
    pub foreground: Rgba8,
    /// Title colour in the structured layout.
    pub accent: Rgba8,
    /// Title font size in pixels.
    pub title_font_size: f32,
    /// Body font size in pixels.
    pub body_font_size: f32,
    /// Vertical gap between the title row and the first body line.
    pub title_gap: f32,
    /// Vertical gap between consecutive body lines.
    pub line_gap: f32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            margin: 100.0,
            background: Rgba8::rgb(30, 30, 30),
            foreground: Rgba8::rgb(255, 255, 255),
            accent: Rgba8::rgb(255, 200, 0),
            title_font_size: 60.0,
            body_font_size: 40.0,
            title_gap: 40.0,
            line_gap: 10.0,
        }
    }
}

impl CanvasSpec {
    /// Font size in pixels for `role`.
    pub fn font_size(&self, role: FontRole) -> f32 {
        match role {
            FontRole::Title => self.title_font_size,
            FontRole::Body => self.body_font_size,
        }
    }

    /// Reject geometry the rasterizer cannot honour.
    pub fn validate(&self) -> SlidecastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidecastError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        for (name, v) in [
            ("margin", self.margin),
            ("title_gap", self.title_gap),
            ("line_gap", self.line_gap),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SlidecastError::validation(format!(
                    "canvas {name} must be finite and >= 0"
                )));
            }
        }
        for (name, v) in [
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(SlidecastError::validation(format!(
                    "canvas {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}
