//! Slidecast turns delimiter-marked slide text into rendered PNG slides and an MP4 slideshow.
//!
//! The pipeline is split into small stages that can be used on their own:
//!
//! - [`parse`] markup into [`SlideRecord`]s
//! - [`layout()`] a slide onto a [`CanvasSpec`] with a [`LayoutPolicy`], producing a [`LayoutPlan`]
//! - rasterize plans with a [`Rasterizer`] and write them with [`render_all`]
//! - assemble slide images into a video with a [`VideoAssembler`] such as [`FfmpegAssembler`]
//!
//! [`SlideService`] strings the stages together behind file-name based operations.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Slideshow video assembly.
pub mod encode;
/// Canvas, layout policies and draw plans.
pub mod layout;
/// Slide markup parsing.
pub mod markup;
/// Rasterization and batch rendering.
pub mod render;

/// JSON configuration.
pub mod config;
/// File-name based front-end operations.
pub mod service;

pub use crate::config::SlidecastConfig;
pub use crate::encode::ffmpeg::{FfmpegAssembler, VideoAssembler, VideoConfig, is_ffmpeg_on_path};
pub use crate::foundation::core::{Point, Rgba8};
pub use crate::foundation::error::{ErrorKind, SlidecastError, SlidecastResult};
pub use crate::layout::canvas::CanvasSpec;
pub use crate::layout::engine::{LayoutPolicy, layout};
pub use crate::layout::plan::{DrawText, FontRole, LayoutPlan};
pub use crate::layout::wrap::{wrap_text, wrap_words};
pub use crate::markup::model::{SlideRecord, UNTITLED_SLIDE};
pub use crate::markup::parser::{
    SLIDE_END, SLIDE_START, TITLE_END, TITLE_START, parse, parse_file,
};
pub use crate::render::batch::{SlideRenderer, render_all, slide_file_name};
pub use crate::render::fonts::{
    BuiltinFontProvider, FontPreferences, FontProvider, FontRequest, FontSet, NamedFontProvider,
    ResolvedFont, build_font_database,
};
pub use crate::render::raster::{Rasterizer, SlideImage, plan_to_svg, save};
pub use crate::service::{SlideService, Workspace, normalize_rel_path};
