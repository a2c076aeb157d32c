use super::*;
use crate::{
    foundation::core::{Point, Rgba8},
    layout::{
        engine::{LayoutPolicy, layout},
        plan::{DrawText, FontRole},
    },
    markup::model::SlideRecord,
};

fn bare_rasterizer() -> Rasterizer {
    Rasterizer::new(
        Arc::new(fontdb::Database::new()),
        &FontPreferences {
            system_fonts: false,
            ..FontPreferences::default()
        },
    )
}

fn small_canvas() -> CanvasSpec {
    CanvasSpec {
        width: 64,
        height: 48,
        margin: 4.0,
        title_font_size: 12.0,
        body_font_size: 8.0,
        ..CanvasSpec::default()
    }
}

#[test]
fn svg_escapes_markup_characters() {
    let mut plan = LayoutPlan::default();
    plan.push(DrawText {
        text: "a < b & \"c\"".to_owned(),
        position: Point::new(1.0, 2.0),
        color: Rgba8::rgb(255, 0, 0),
        role: FontRole::Body,
        line_spacing: 0.0,
    });
    let svg = plan_to_svg(&plan, &small_canvas(), bare_rasterizer().fonts());
    assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    assert!(svg.contains(r##"fill="#ff0000""##));
    assert!(svg.contains(r#"font-family="sans-serif""#));
    assert!(svg.contains(r#"<tspan x="1" y="2">"#));
}

#[test]
fn svg_advances_multiline_blocks_and_skips_blank_lines() {
    let mut plan = LayoutPlan::default();
    plan.push(DrawText {
        text: "one\n\nthree".to_owned(),
        position: Point::new(10.0, 20.0),
        color: Rgba8::rgb(255, 255, 255),
        role: FontRole::Body,
        line_spacing: 2.0,
    });
    let svg = plan_to_svg(&plan, &small_canvas(), bare_rasterizer().fonts());
    assert!(svg.contains(r#"<tspan x="10" y="20">one</tspan>"#));
    assert!(svg.contains(r#"<tspan x="10" y="40">three</tspan>"#));
    assert_eq!(svg.matches("<tspan").count(), 2);
}

#[test]
fn svg_uses_role_weights_and_sizes() {
    let slide = SlideRecord::new("Title", ["body"]);
    let canvas = small_canvas();
    let plan = layout(&slide, &canvas, LayoutPolicy::Structured);
    let svg = plan_to_svg(&plan, &canvas, bare_rasterizer().fonts());
    assert!(svg.contains(r#"font-size="12" font-weight="700""#));
    assert!(svg.contains(r#"font-size="8" font-weight="400""#));
}

#[test]
fn rasterize_fills_background_at_canvas_size() {
    let canvas = small_canvas();
    let plan = layout(
        &SlideRecord::new("T", ["x"]),
        &canvas,
        LayoutPolicy::Structured,
    );
    let img = bare_rasterizer().rasterize(&plan, &canvas).unwrap();

    assert_eq!((img.width, img.height), (64, 48));
    assert_eq!(img.data.len(), 64 * 48 * 4);
    assert_eq!(img.pixel(0, 0), Some([30, 30, 30, 255]));
    assert_eq!(img.pixel(63, 47), Some([30, 30, 30, 255]));
    assert_eq!(img.pixel(64, 0), None);
}

#[test]
fn rasterize_empty_plan_is_plain_background() {
    let canvas = CanvasSpec {
        background: Rgba8::rgb(1, 2, 3),
        ..small_canvas()
    };
    let img = bare_rasterizer()
        .rasterize(&LayoutPlan::default(), &canvas)
        .unwrap();
    assert!(img.data.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
}

#[test]
fn encode_png_produces_png_stream() {
    let img = SlideImage {
        width: 2,
        height: 2,
        data: vec![255; 16],
    };
    let bytes = img.encode_png().unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn save_creates_parents_and_overwrites() {
    let dir = PathBuf::from("target").join("unit_raster_save").join("nested");
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("slide.png");

    let first = SlideImage {
        width: 4,
        height: 2,
        data: vec![0; 32],
    };
    assert_eq!(save(&first, &path).unwrap(), path);

    let second = SlideImage {
        width: 2,
        height: 2,
        data: vec![9; 16],
    };
    save(&second, &path).unwrap();
    assert_eq!(image::image_dimensions(&path).unwrap(), (2, 2));
}

#[test]
fn save_reports_unwritable_target() {
    let dir = PathBuf::from("target").join("unit_raster_blocked");
    std::fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("file");
    std::fs::write(&blocker, b"not a dir").unwrap();

    let img = SlideImage {
        width: 1,
        height: 1,
        data: vec![0; 4],
    };
    let err = save(&img, &blocker.join("slide.png")).unwrap_err();
    assert!(matches!(err, SlidecastError::Render(_)));
}

#[test]
fn svg_drops_non_xml_characters() {
    let mut plan = LayoutPlan::default();
    plan.push(DrawText {
        text: "bad \u{FFFF}\u{FFFE}\u{1} char \u{1F600}".to_owned(),
        position: Point::new(0.0, 0.0),
        color: Rgba8::rgb(255, 255, 255),
        role: FontRole::Body,
        line_spacing: 0.0,
    });
    let svg = plan_to_svg(&plan, &small_canvas(), bare_rasterizer().fonts());
    assert!(svg.contains(">bad  char \u{1F600}<"));
    assert!(!svg.contains('\u{FFFF}'));
    assert!(!svg.contains('\u{FFFE}'));
}

#[test]
fn svg_keeps_tabs_as_spaces() {
    let mut plan = LayoutPlan::default();
    plan.push(DrawText {
        text: "a\tb\rc".to_owned(),
        position: Point::new(0.0, 0.0),
        color: Rgba8::rgb(255, 255, 255),
        role: FontRole::Body,
        line_spacing: 0.0,
    });
    let svg = plan_to_svg(&plan, &small_canvas(), bare_rasterizer().fonts());
    assert!(svg.contains(">a b c<"));
}

#[test]
fn rasterize_accepts_non_xml_characters() {
    let canvas = small_canvas();
    let plan = layout(
        &SlideRecord::new("T\u{FFFE}", ["bad \u{FFFF} char"]),
        &canvas,
        LayoutPolicy::Structured,
    );
    assert!(bare_rasterizer().rasterize(&plan, &canvas).is_ok());
}

fn near(px: [u8; 4], c: Rgba8) -> bool {
    px[0].abs_diff(c.r) <= 8 && px[1].abs_diff(c.g) <= 8 && px[2].abs_diff(c.b) <= 8
}

fn count_in_rows(img: &SlideImage, rows: std::ops::Range<u32>, c: Rgba8) -> usize {
    rows.flat_map(|y| (0..img.width).map(move |x| (x, y)))
        .filter_map(|(x, y)| img.pixel(x, y))
        .filter(|px| near(*px, c))
        .count()
}

#[test]
fn rasterize_draws_title_and_body_glyphs_with_system_fonts() {
    let prefs = FontPreferences::default();
    let db = build_font_database(&prefs);
    if db.is_empty() {
        return;
    }
    let rasterizer = Rasterizer::new(Arc::new(db), &prefs);
    let canvas = CanvasSpec::default();
    let plan = layout(
        &SlideRecord::new("Quarterly Review", ["Revenue up", "Costs down"]),
        &canvas,
        LayoutPolicy::Structured,
    );
    let img = rasterizer.rasterize(&plan, &canvas).unwrap();

    let title_rows = 100..200;
    let body_rows = 200..320;
    assert!(count_in_rows(&img, title_rows.clone(), canvas.accent) > 100);
    assert!(count_in_rows(&img, body_rows.clone(), canvas.foreground) > 100);
    assert_eq!(count_in_rows(&img, body_rows, canvas.accent), 0);
    assert_eq!(count_in_rows(&img, 0..100, canvas.accent), 0);
    assert_eq!(count_in_rows(&img, title_rows, canvas.foreground), 0);
}
