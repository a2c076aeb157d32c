use std::{
    io::Read as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{SlidecastError, SlidecastResult},
    fs::ensure_parent_dir,
};

/// Slideshow timing and output options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Output frame rate.
    pub fps: u32,
    /// How long each slide stays on screen.
    pub seconds_per_slide: f64,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Colour that translucent slide pixels are flattened onto.
    pub background: Rgba8,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 1,
            seconds_per_slide: 15.0,
            overwrite: true,
            background: Rgba8::rgb(0, 0, 0),
        }
    }
}

impl VideoConfig {
    /// Reject timing that cannot produce frames.
    pub fn validate(&self) -> SlidecastResult<()> {
        if self.fps == 0 {
            return Err(SlidecastError::validation("video fps must be non-zero"));
        }
        if !self.seconds_per_slide.is_finite() || self.seconds_per_slide <= 0.0 {
            return Err(SlidecastError::validation(
                "video seconds_per_slide must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Number of identical frames emitted per slide (at least one).
    pub fn frames_per_slide(&self) -> u64 {
        (f64::from(self.fps) * self.seconds_per_slide)
            .round()
            .max(1.0) as u64
    }
}

/// Turns an ordered list of slide images into a video file.
///
/// The order of `slides` is the temporal order of the result.
pub trait VideoAssembler {
    /// Encode `slides` into `out_path` and return the written path.
    fn assemble(&mut self, slides: &[PathBuf], out_path: &Path) -> SlidecastResult<PathBuf>;
}

/// [`VideoAssembler`] that streams frames into the system `ffmpeg` binary (H.264 MP4).
#[derive(Clone, Debug, Default)]
pub struct FfmpegAssembler {
    cfg: VideoConfig,
}

impl FfmpegAssembler {
    /// Assembler with the given timing.
    pub fn new(cfg: VideoConfig) -> Self {
        Self { cfg }
    }

    /// Active configuration.
    pub fn config(&self) -> &VideoConfig {
        &self.cfg
    }

    fn encode(&self, slides: &[PathBuf], out_path: &Path) -> SlidecastResult<PathBuf> {
        let Some((first_path, rest)) = slides.split_first() else {
            return Err(SlidecastError::empty_input(
                "no slides provided for video creation",
            ));
        };

        let first = load_slide_rgba8(first_path)?;
        let (width, height) = first.dimensions();
        let repeat = self.cfg.frames_per_slide();

        let mut encoder = SlideshowEncoder::start(&self.cfg, width, height, out_path)?;
        encoder.push_slide(first.as_raw(), repeat)?;
        for path in rest {
            let img = load_slide_rgba8(path)?;
            if img.dimensions() != (width, height) {
                return Err(SlidecastError::validation(format!(
                    "slide '{}' is {}x{}, expected {width}x{height}",
                    path.display(),
                    img.width(),
                    img.height()
                )));
            }
            encoder.push_slide(img.as_raw(), repeat)?;
        }
        encoder.finish()?;

        Ok(out_path.to_path_buf())
    }
}

impl VideoAssembler for FfmpegAssembler {
    fn assemble(&mut self, slides: &[PathBuf], out_path: &Path) -> SlidecastResult<PathBuf> {
        tracing::info!(
            out = %out_path.display(),
            slides = slides.len(),
            "creating video"
        );

        let result = if slides.is_empty() {
            Err(SlidecastError::empty_input(
                "no slides provided for video creation",
            ))
        } else {
            self.cfg
                .validate()
                .and_then(|()| self.encode(slides, out_path))
        };

        match &result {
            Ok(path) => tracing::info!(out = %path.display(), "video saved"),
            Err(e) => tracing::error!(error = %e, "video creation failed"),
        }
        result
    }
}

fn load_slide_rgba8(path: &Path) -> SlidecastResult<image::RgbaImage> {
    let img = image::open(path).map_err(|e| {
        SlidecastError::encode(format!("failed to load slide '{}': {e}", path.display()))
    })?;
    Ok(img.to_rgba8())
}

/// Running `ffmpeg` child fed with raw opaque RGBA frames on stdin.
struct SlideshowEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    background: Rgba8,
    scratch: Vec<u8>,
}

impl SlideshowEncoder {
    fn start(cfg: &VideoConfig, width: u32, height: u32, out_path: &Path) -> SlidecastResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlidecastError::validation(
                "slide width/height must be non-zero",
            ));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            return Err(SlidecastError::validation(format!(
                "slide size {width}x{height} must be even (required for yuv420p mp4 output)"
            )));
        }

        ensure_parent_dir(out_path)?;
        if !cfg.overwrite && out_path.exists() {
            return Err(SlidecastError::validation(format!(
                "output file '{}' already exists",
                out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(SlidecastError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if cfg.overwrite { "-y" } else { "-n" });

        // Raw input rate must precede `-i`.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{width}x{height}"),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(out_path);

        let mut child = cmd.spawn().map_err(|e| {
            SlidecastError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SlidecastError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| SlidecastError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            background: cfg.background,
            scratch: vec![0u8; (width as usize) * (height as usize) * 4],
        })
    }

    fn push_slide(&mut self, rgba: &[u8], repeat: u64) -> SlidecastResult<()> {
        flatten_over_bg_to_opaque_rgba8(&mut self.scratch, rgba, self.background)?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(SlidecastError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        for _ in 0..repeat {
            stdin.write_all(&self.scratch).map_err(|e| {
                SlidecastError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
            })?;
        }
        Ok(())
    }

    fn finish(mut self) -> SlidecastResult<()> {
        drop(self.stdin.take());

        let status = self.child.wait().map_err(|e| {
            SlidecastError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| SlidecastError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| SlidecastError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(SlidecastError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for SlideshowEncoder {
    fn drop(&mut self) {
        // Abandoned mid-stream: close stdin and reap the child.
        if self.stdin.take().is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn flatten_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    bg: Rgba8,
) -> SlidecastResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SlidecastError::validation(
            "flatten_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg.r);
    let bg_g = u16::from(bg.g);
    let bg_b = u16::from(bg.b);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = mul_div255(u16::from(s[0]), a) + mul_div255(bg_r, inv);
        let g = mul_div255(u16::from(s[1]), a) + mul_div255(bg_g, inv);
        let b = mul_div255(u16::from(s[2]), a) + mul_div255(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
