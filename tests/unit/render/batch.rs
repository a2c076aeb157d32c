use std::sync::Arc;

use super::*;
use crate::{foundation::error::SlidecastError, render::fonts::FontPreferences};

fn tiny_renderer() -> SlideRenderer {
    let prefs = FontPreferences {
        system_fonts: false,
        ..FontPreferences::default()
    };
    SlideRenderer::new(
        CanvasSpec {
            width: 32,
            height: 18,
            margin: 2.0,
            title_font_size: 6.0,
            body_font_size: 4.0,
            ..CanvasSpec::default()
        },
        LayoutPolicy::Structured,
        Rasterizer::new(Arc::new(usvg::fontdb::Database::new()), &prefs),
    )
}

fn fresh_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn file_names_are_one_based_and_padded() {
    assert_eq!(slide_file_name(1, 1), "slide_001.png");
    assert_eq!(slide_file_name(42, 99), "slide_042.png");
    assert_eq!(slide_file_name(999, 999), "slide_999.png");
}

#[test]
fn file_names_widen_past_999_slides() {
    assert_eq!(slide_file_name(1, 1000), "slide_0001.png");
    assert_eq!(slide_file_name(1000, 1000), "slide_1000.png");
    assert_eq!(slide_file_name(7, 12_345), "slide_00007.png");
}

#[test]
fn render_all_returns_paths_in_input_order() {
    let dir = fresh_dir("unit_batch_order");
    let slides: Vec<SlideRecord> = (1..=4)
        .map(|i| SlideRecord::new(format!("S{i}"), [format!("line {i}")]))
        .collect();

    let paths = tiny_renderer().render_all(&slides, &dir).unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "slide_001.png",
            "slide_002.png",
            "slide_003.png",
            "slide_004.png"
        ]
    );
    for p in &paths {
        assert_eq!(p.parent().unwrap(), dir.as_path());
        assert_eq!(image::image_dimensions(p).unwrap(), (32, 18));
    }
}

#[test]
fn render_all_with_no_slides_leaves_disk_alone() {
    let dir = fresh_dir("unit_batch_empty");
    let paths = render_all(&tiny_renderer(), &[], &dir).unwrap();
    assert!(paths.is_empty());
    assert!(!dir.exists());
}

#[test]
fn render_all_aborts_on_first_failure() {
    let dir = fresh_dir("unit_batch_blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("not_a_dir");
    std::fs::write(&blocker, b"x").unwrap();

    let slides = vec![SlideRecord::untitled(["a"]), SlideRecord::untitled(["b"])];
    let err = render_all(&tiny_renderer(), &slides, &blocker).unwrap_err();
    assert!(matches!(err, SlidecastError::Render(_)));
}

#[test]
fn render_slide_uses_renderer_canvas() {
    let renderer = tiny_renderer();
    let img = renderer
        .render_slide(&SlideRecord::new("t", ["b"]))
        .unwrap();
    assert_eq!((img.width, img.height), (32, 18));
    assert_eq!(renderer.policy(), LayoutPolicy::Structured);
}
