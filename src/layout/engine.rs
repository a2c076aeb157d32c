use serde::{Deserialize, Serialize};

use crate::{
    foundation::{
        core::Point,
        error::{SlidecastError, SlidecastResult},
    },
    layout::{
        canvas::CanvasSpec,
        plan::{DrawText, FontRole, LayoutPlan},
        wrap::wrap_text,
    },
    markup::model::SlideRecord,
};

/// How a slide's text is arranged on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum LayoutPolicy {
    /// Accent-coloured title at the top-left margin, one body line per row below it.
    ///
    /// Lines are not wrapped; text wider than the canvas overflows.
    #[default]
    Structured,
    /// Title and body flattened into a single block, greedily word-wrapped and drawn as one
    /// multi-line instruction.
    Wrapped {
        /// Character budget per line.
        #[serde(default = "default_max_chars")]
        max_chars: usize,
        /// Extra pixels between wrapped lines.
        #[serde(default = "default_line_spacing")]
        line_spacing: f32,
    },
}

fn default_max_chars() -> usize {
    50
}

fn default_line_spacing() -> f32 {
    10.0
}

impl LayoutPolicy {
    /// Wrapped policy with the default budget and spacing.
    pub fn wrapped() -> Self {
        Self::Wrapped {
            max_chars: default_max_chars(),
            line_spacing: default_line_spacing(),
        }
    }

    /// Reject a policy that cannot produce a layout.
    pub fn validate(&self) -> SlidecastResult<()> {
        if let Self::Wrapped {
            max_chars,
            line_spacing,
        } = *self
        {
            if max_chars == 0 {
                return Err(SlidecastError::validation(
                    "wrapped layout max_chars must be > 0",
                ));
            }
            if !line_spacing.is_finite() || line_spacing < 0.0 {
                return Err(SlidecastError::validation(
                    "wrapped layout line_spacing must be finite and >= 0",
                ));
            }
        }
        Ok(())
    }
}

/// Arrange one slide on `canvas` according to `policy`.
pub fn layout(slide: &SlideRecord, canvas: &CanvasSpec, policy: LayoutPolicy) -> LayoutPlan {
    match policy {
        LayoutPolicy::Structured => layout_structured(slide, canvas),
        LayoutPolicy::Wrapped {
            max_chars,
            line_spacing,
        } => layout_wrapped(slide, canvas, max_chars, line_spacing),
    }
}

fn layout_structured(slide: &SlideRecord, canvas: &CanvasSpec) -> LayoutPlan {
    let mut plan = LayoutPlan::default();
    plan.push(DrawText {
        text: slide.title.clone(),
        position: Point::new(canvas.margin, canvas.margin),
        color: canvas.accent,
        role: FontRole::Title,
        line_spacing: 0.0,
    });

    let stride = canvas.body_font_size + canvas.line_gap;
    let mut y = canvas.margin + canvas.title_font_size + canvas.title_gap;
    for line in &slide.content {
        plan.push(DrawText {
            text: line.clone(),
            position: Point::new(canvas.margin, y),
            color: canvas.foreground,
            role: FontRole::Body,
            line_spacing: 0.0,
        });
        y += stride;
    }
    plan
}

fn layout_wrapped(
    slide: &SlideRecord,
    canvas: &CanvasSpec,
    max_chars: usize,
    line_spacing: f32,
) -> LayoutPlan {
    let mut block = String::with_capacity(
        slide.title.len() + slide.content.iter().map(|l| l.len() + 1).sum::<usize>() + 2,
    );
    block.push_str(&slide.title);
    block.push_str("\n\n");
    block.push_str(&slide.content.join("\n"));

    let mut plan = LayoutPlan::default();
    plan.push(DrawText {
        text: wrap_text(&block, max_chars).join("\n"),
        position: Point::new(canvas.margin, canvas.margin),
        color: canvas.foreground,
        role: FontRole::Body,
        line_spacing,
    });
    plan
}

#[cfg(test)]
#[path = "../../tests/unit/layout/engine.rs"]
mod tests;
