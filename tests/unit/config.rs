use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn empty_object_is_the_default_config() {
    let cfg = SlidecastConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, SlidecastConfig::default());
    assert_eq!((cfg.canvas.width, cfg.canvas.height), (1280, 720));
    assert_eq!(cfg.layout, LayoutPolicy::Structured);
    assert_eq!(cfg.video.fps, 1);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let cfg = SlidecastConfig::from_json_str(
        r##"{
            "canvas": { "width": 1920, "height": 1080, "accent": "#4fc3f7" },
            "layout": { "mode": "wrapped", "max_chars": 40 },
            "video": { "fps": 24, "seconds_per_slide": 5.0 }
        }"##,
    )
    .unwrap();

    assert_eq!(cfg.canvas.width, 1920);
    assert_eq!(cfg.canvas.accent, Rgba8::rgb(0x4f, 0xc3, 0xf7));
    assert_eq!(cfg.canvas.margin, 100.0);
    assert_eq!(
        cfg.layout,
        LayoutPolicy::Wrapped {
            max_chars: 40,
            line_spacing: 10.0
        }
    );
    assert_eq!(cfg.video.frames_per_slide(), 120);
    assert_eq!(cfg.fonts, FontPreferences::default());
}

#[test]
fn invalid_values_are_rejected() {
    assert!(matches!(
        SlidecastConfig::from_json_str(r#"{"canvas":{"width":0}}"#),
        Err(SlidecastError::Validation(_))
    ));
    assert!(matches!(
        SlidecastConfig::from_json_str(r#"{"layout":{"mode":"wrapped","max_chars":0}}"#),
        Err(SlidecastError::Validation(_))
    ));
    assert!(matches!(
        SlidecastConfig::from_json_str(r#"{"canvas":{"body_font_size":-1}}"#),
        Err(SlidecastError::Validation(_))
    ));
}

#[test]
fn malformed_json_is_a_serde_error() {
    assert!(matches!(
        SlidecastConfig::from_json_str("{ not json"),
        Err(SlidecastError::Serde(_))
    ));
    assert!(matches!(
        SlidecastConfig::from_json_str(r#"{"layout":{"mode":"diagonal"}}"#),
        Err(SlidecastError::Serde(_))
    ));
}

#[test]
fn round_trips_through_json() {
    let cfg = SlidecastConfig {
        layout: LayoutPolicy::wrapped(),
        ..SlidecastConfig::default()
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SlidecastConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn from_path_reads_file() {
    let dir = std::path::PathBuf::from("target").join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("slidecast.json");
    std::fs::write(&path, r#"{"video":{"seconds_per_slide":3}}"#).unwrap();

    let cfg = SlidecastConfig::from_path(&path).unwrap();
    assert_eq!(cfg.video.seconds_per_slide, 3.0);
    assert!(SlidecastConfig::from_path(&dir.join("missing.json")).is_err());
}
