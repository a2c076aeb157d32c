use serde::{Deserialize, Serialize};

use crate::foundation::core::{Point, Rgba8};

/// Which font a draw instruction uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// Slide title.
    Title,
    /// Body text.
    Body,
}

/// One text draw instruction.
///
/// `position` is the top-left corner of the first line. `text` may span several lines separated
/// by `\n`; consecutive lines advance by the role's font size plus `line_spacing`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawText {
    /// Text to draw.
    pub text: String,
    /// Top-left anchor in canvas pixels.
    pub position: Point,
    /// Fill colour.
    pub color: Rgba8,
    /// Font selection.
    pub role: FontRole,
    /// Extra gap between lines of a multi-line instruction.
    pub line_spacing: f32,
}

impl DrawText {
    /// Lines of this instruction in draw order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Renderer-agnostic description of where text goes on one slide.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    /// Draw instructions, back to front.
    pub items: Vec<DrawText>,
}

impl LayoutPlan {
    /// Append an instruction.
    pub fn push(&mut self, item: DrawText) {
        self.items.push(item);
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when nothing is drawn.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate instructions in draw order.
    pub fn iter(&self) -> std::slice::Iter<'_, DrawText> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a LayoutPlan {
    type Item = &'a DrawText;
    type IntoIter = std::slice::Iter<'a, DrawText>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
