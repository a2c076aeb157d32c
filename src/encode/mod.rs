//! Slideshow video assembly.

/// `ffmpeg`-based MP4 assembly.
pub mod ffmpeg;
