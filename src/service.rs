//! Request-level operations for a slide-rendering front end (an HTTP layer, a job runner).
//!
//! A [`SlideService`] owns a [`Workspace`] of three directories: uploaded markup files,
//! rendered slide folders and finished videos. Callers address files by workspace-relative
//! name; errors carry a [`SlidecastError::kind`] so a front end can answer "not found",
//! "bad request" or "server error" with the error message as detail.

use std::path::{Path, PathBuf};

use crate::{
    encode::ffmpeg::VideoAssembler,
    foundation::error::{SlidecastError, SlidecastResult},
    markup::{model::SlideRecord, parser::parse_file},
    render::batch::SlideRenderer,
};

/// Directory layout used by [`SlideService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workspace {
    /// Markup inputs.
    pub inputs: PathBuf,
    /// Rendered slides, one sub-directory per input.
    pub slides: PathBuf,
    /// Assembled videos.
    pub videos: PathBuf,
}

impl Workspace {
    /// `inputs/`, `slides/` and `videos/` below `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            inputs: root.join("inputs"),
            slides: root.join("slides"),
            videos: root.join("videos"),
        }
    }
}

/// Parse, render and assemble on behalf of a caller that only knows file names.
pub struct SlideService {
    workspace: Workspace,
    renderer: SlideRenderer,
    assembler: Box<dyn VideoAssembler>,
}

impl SlideService {
    /// Service over `workspace`.
    pub fn new(
        workspace: Workspace,
        renderer: SlideRenderer,
        assembler: Box<dyn VideoAssembler>,
    ) -> Self {
        Self {
            workspace,
            renderer,
            assembler,
        }
    }

    /// Directory layout.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Parse the uploaded markup file `filename`.
    pub fn parse_slides(&self, filename: &str) -> SlidecastResult<Vec<SlideRecord>> {
        let input = self.input_path(filename)?;
        parse_file(&input).inspect_err(|e| log_failure("parse_slides", e))
    }

    /// Render every slide of `filename` and return the generated image file names in slide
    /// order.
    pub fn render_all_slides(&self, filename: &str) -> SlidecastResult<Vec<String>> {
        let paths = self.render_input(filename)?;
        Ok(paths
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    /// Render `filename` and assemble its slides into `videos/<video_name>`; returns the video
    /// name.
    pub fn generate_video(&mut self, filename: &str, video_name: &str) -> SlidecastResult<String> {
        let video_rel = normalize_rel_path(video_name)?;
        let slides = self.render_input(filename)?;
        let out = self.workspace.videos.join(&video_rel);
        self.assembler
            .assemble(&slides, &out)
            .inspect_err(|e| log_failure("generate_video", e))?;
        tracing::info!(video = %video_rel, "video generated");
        Ok(video_rel)
    }

    /// Location of a finished video, for download.
    pub fn video_path(&self, video_name: &str) -> SlidecastResult<PathBuf> {
        let path = self.workspace.videos.join(normalize_rel_path(video_name)?);
        if !path.is_file() {
            return Err(SlidecastError::not_found(format!(
                "video '{video_name}' does not exist"
            )));
        }
        Ok(path)
    }

    fn render_input(&self, filename: &str) -> SlidecastResult<Vec<PathBuf>> {
        let input = self.input_path(filename)?;
        let slides = parse_file(&input).inspect_err(|e| log_failure("render", e))?;
        let out_dir = self
            .workspace
            .slides
            .join(Path::new(&normalize_rel_path(filename)?).with_extension(""));
        self.renderer
            .render_all(&slides, &out_dir)
            .inspect_err(|e| log_failure("render", e))
    }

    fn input_path(&self, filename: &str) -> SlidecastResult<PathBuf> {
        let path = self.workspace.inputs.join(normalize_rel_path(filename)?);
        if !path.is_file() {
            tracing::warn!(file = %filename, "input file not found");
            return Err(SlidecastError::not_found(format!(
                "input file '{filename}' does not exist"
            )));
        }
        Ok(path)
    }
}

fn log_failure(op: &str, err: &SlidecastError) {
    tracing::error!(op, kind = ?err.kind(), error = %err, "slide service request failed");
}

/// Normalize and validate a workspace-relative file name.
///
/// The result uses `/` separators and has `.` segments removed; absolute paths, parent
/// traversals (`..`) and empty names are rejected.
pub fn normalize_rel_path(source: &str) -> SlidecastResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(SlidecastError::validation("file names must be relative"));
    }

    let mut parts = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(SlidecastError::validation(
                    "file names must not contain '..'",
                ));
            }
            p if p.contains(':') => {
                return Err(SlidecastError::validation(
                    "file names must not contain drive prefixes",
                ));
            }
            p => parts.push(p),
        }
    }

    if parts.is_empty() {
        return Err(SlidecastError::validation("file name must not be empty"));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../tests/unit/service.rs"]
mod tests;
