//! Slide rasterization (`usvg` + `resvg`) and batch rendering to PNG files.

/// Sequential multi-slide rendering.
pub mod batch;
/// Font database and font selection.
pub mod fonts;
/// Plan-to-pixels rasterizer and PNG output.
pub mod raster;
