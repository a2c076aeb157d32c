use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

use crate::{
    foundation::{
        error::{SlidecastError, SlidecastResult},
        fs::ensure_parent_dir,
    },
    layout::{canvas::CanvasSpec, plan::LayoutPlan},
    render::fonts::{FontPreferences, FontSet, GENERIC_SANS, build_font_database, make_font_resolver},
};

/// Rendered slide pixels: row-major, straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl SlideImage {
    /// RGBA of the pixel at `(x, y)`, if inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> SlidecastResult<Vec<u8>> {
        use image::ImageEncoder as _;

        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(
                &self.data,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| SlidecastError::render(format!("png encode failed: {e}")))?;
        Ok(out)
    }
}

/// Draws [`LayoutPlan`]s with a fixed font database and font selection.
///
/// The plan is turned into a small SVG document (one `<text>` per instruction, one `<tspan>` per
/// line, anchored at the top-left via `dominant-baseline`), parsed by `usvg` and painted by
/// `resvg` over a pixmap filled with the canvas background.
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    fonts: FontSet,
}

impl Rasterizer {
    /// Rasterizer over an existing database.
    pub fn new(fontdb: Arc<fontdb::Database>, prefs: &FontPreferences) -> Self {
        let fonts = FontSet::resolve(&fontdb, prefs);
        tracing::debug!(
            provider = fonts.provider,
            title = %fonts.title.family,
            body = %fonts.body.family,
            "fonts resolved"
        );
        Self { fontdb, fonts }
    }

    /// Build the font database described by `prefs`, then resolve fonts against it.
    pub fn from_preferences(prefs: &FontPreferences) -> Self {
        Self::new(Arc::new(build_font_database(prefs)), prefs)
    }

    /// Selected fonts.
    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    /// Backing font database.
    pub fn fontdb(&self) -> &fontdb::Database {
        &self.fontdb
    }

    /// Paint `plan` onto a fresh `canvas`-sized image.
    pub fn rasterize(&self, plan: &LayoutPlan, canvas: &CanvasSpec) -> SlidecastResult<SlideImage> {
        let svg = plan_to_svg(plan, canvas, &self.fonts);

        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            font_resolver: make_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).map_err(|e| {
            tracing::error!(error = %e, "slide svg rejected");
            SlidecastError::render(format!("build slide scene: {e}"))
        })?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| {
                SlidecastError::render(format!(
                    "failed to allocate {}x{} pixmap",
                    canvas.width, canvas.height
                ))
            })?;
        let bg = canvas.background;
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let mut data = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }

        Ok(SlideImage {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }
}

/// Write `image` as PNG to `path`, creating parent directories and replacing any existing file.
pub fn save(image: &SlideImage, path: &Path) -> SlidecastResult<PathBuf> {
    let result = ensure_parent_dir(path)
        .map_err(|e| SlidecastError::render(format!("{e:#}")))
        .and_then(|()| {
            image::save_buffer_with_format(
                path,
                &image.data,
                image.width,
                image.height,
                image::ColorType::Rgba8,
                image::ImageFormat::Png,
            )
            .map_err(|e| SlidecastError::render(format!("write png '{}': {e}", path.display())))
        });

    if let Err(e) = &result {
        tracing::error!(path = %path.display(), error = %e, "slide save failed");
    }
    result?;

    tracing::debug!(path = %path.display(), "slide saved");
    Ok(path.to_path_buf())
}

/// SVG document equivalent of `plan` on `canvas` (background excluded).
pub fn plan_to_svg(plan: &LayoutPlan, canvas: &CanvasSpec, fonts: &FontSet) -> String {
    let mut svg = String::with_capacity(256 + plan.len() * 160);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height,
    );

    for item in plan {
        let font = fonts.for_role(item.role);
        let size = canvas.font_size(item.role);
        let _ = write!(
            svg,
            r#"<text font-family="{family}" font-size="{size}" font-weight="{weight}" fill="{fill}" fill-opacity="{opacity}" dominant-baseline="text-before-edge" xml:space="preserve">"#,
            family = escape_xml(&css_family(&font.family)),
            weight = font.weight,
            fill = item.color.to_hex_rgb(),
            opacity = item.color.opacity(),
        );

        let advance = size + item.line_spacing;
        for (i, line) in item.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = item.position.y + advance * i as f32;
            let _ = write!(
                svg,
                r#"<tspan x="{x}" y="{y}">{text}</tspan>"#,
                x = item.position.x,
                text = escape_xml(line),
            );
        }
        svg.push_str("</text>");
    }

    svg.push_str("</svg>");
    svg
}

fn css_family(name: &str) -> String {
    if name == GENERIC_SANS {
        return name.to_owned();
    }
    let cleaned: String = name.chars().filter(|c| *c != '\'' && *c != '"').collect();
    format!("'{cleaned}'")
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c.is_whitespace() => out.push(' '),
            c if c.is_control() || !is_xml_char(c) => {}
            c => out.push(c),
        }
    }
    out
}

/// XML 1.0 `Char` production; surrogates are already excluded by `char`.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
