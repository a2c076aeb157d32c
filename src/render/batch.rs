use std::path::{Path, PathBuf};

use crate::{
    config::SlidecastConfig,
    foundation::error::SlidecastResult,
    layout::{
        canvas::CanvasSpec,
        engine::{LayoutPolicy, layout},
    },
    markup::model::SlideRecord,
    render::raster::{Rasterizer, SlideImage, save},
};

/// Layout + rasterization for one slide at a time.
pub struct SlideRenderer {
    canvas: CanvasSpec,
    policy: LayoutPolicy,
    rasterizer: Rasterizer,
}

impl SlideRenderer {
    /// Renderer over an existing rasterizer.
    pub fn new(canvas: CanvasSpec, policy: LayoutPolicy, rasterizer: Rasterizer) -> Self {
        Self {
            canvas,
            policy,
            rasterizer,
        }
    }

    /// Validate `cfg` and build a renderer with its font database.
    pub fn from_config(cfg: &SlidecastConfig) -> SlidecastResult<Self> {
        cfg.validate()?;
        Ok(Self::new(
            cfg.canvas.clone(),
            cfg.layout,
            Rasterizer::from_preferences(&cfg.fonts),
        ))
    }

    /// Canvas used for every slide.
    pub fn canvas(&self) -> &CanvasSpec {
        &self.canvas
    }

    /// Active layout policy.
    pub fn policy(&self) -> LayoutPolicy {
        self.policy
    }

    /// Underlying rasterizer.
    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    /// Lay out and paint `slide`.
    pub fn render_slide(&self, slide: &SlideRecord) -> SlidecastResult<SlideImage> {
        let plan = layout(slide, &self.canvas, self.policy);
        self.rasterizer.rasterize(&plan, &self.canvas)
    }

    /// Render `slide` and write it as PNG to `path`.
    pub fn render_to_file(&self, slide: &SlideRecord, path: &Path) -> SlidecastResult<PathBuf> {
        tracing::debug!(path = %path.display(), title = %slide.title, "rendering slide");
        let image = self.render_slide(slide)?;
        save(&image, path)
    }

    /// See [`render_all`].
    pub fn render_all(
        &self,
        slides: &[SlideRecord],
        out_dir: &Path,
    ) -> SlidecastResult<Vec<PathBuf>> {
        render_all(self, slides, out_dir)
    }
}

/// File name of the 1-based `index`-th slide in a batch of `total`.
///
/// Indices are zero-padded to three digits, or to the digit count of `total` when that is
/// larger, so names always sort in slide order.
pub fn slide_file_name(index: usize, total: usize) -> String {
    let width = total.max(1).to_string().len().max(3);
    format!("slide_{index:0width$}.png")
}

/// Render every slide into `out_dir` as `slide_001.png`, `slide_002.png`, … and return the
/// paths in input order.
///
/// The first failing slide aborts the batch. An empty batch touches nothing on disk.
#[tracing::instrument(skip(renderer, slides), fields(count = slides.len(), out_dir = %out_dir.display()))]
pub fn render_all(
    renderer: &SlideRenderer,
    slides: &[SlideRecord],
    out_dir: &Path,
) -> SlidecastResult<Vec<PathBuf>> {
    if slides.is_empty() {
        tracing::info!("no slides to render");
        return Ok(Vec::new());
    }

    let mut paths = Vec::with_capacity(slides.len());
    for (i, slide) in slides.iter().enumerate() {
        let path = out_dir.join(slide_file_name(i + 1, slides.len()));
        let path = renderer.render_to_file(slide, &path).inspect_err(|e| {
            tracing::error!(index = i + 1, error = %e, "render all slides failed");
        })?;
        paths.push(path);
    }

    tracing::info!(count = paths.len(), "slides rendered");
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
