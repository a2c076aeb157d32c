//! Slide text layout: canvas constants, layout policies and the resulting draw plans.

/// Canvas geometry and palette.
pub mod canvas;
/// Layout policies.
pub mod engine;
/// Draw instructions.
pub mod plan;
/// Greedy word wrapping.
pub mod wrap;
