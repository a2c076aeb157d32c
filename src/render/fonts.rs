use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use usvg::fontdb;

use crate::layout::plan::FontRole;

/// Family name used when the font database has no faces at all.
pub const GENERIC_SANS: &str = "sans-serif";

/// A family + weight pair to look up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontRequest {
    /// Family name as registered in the font files (e.g. `DejaVu Sans`).
    pub family: String,
    /// CSS-style weight (400 regular, 700 bold).
    pub weight: u16,
}

impl FontRequest {
    /// Construct a request.
    pub fn new(family: impl Into<String>, weight: u16) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }
}

/// Preferred fonts and where to find them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPreferences {
    /// Title face; bold DejaVu Sans by default.
    pub title: FontRequest,
    /// Body face; regular DejaVu Sans by default.
    pub body: FontRequest,
    /// Extra directories scanned for `.ttf`, `.otf` and `.ttc` files.
    pub font_dirs: Vec<PathBuf>,
    /// Also load the fonts installed on the system.
    pub system_fonts: bool,
}

impl Default for FontPreferences {
    fn default() -> Self {
        Self {
            title: FontRequest::new("DejaVu Sans", 700),
            body: FontRequest::new("DejaVu Sans", 400),
            font_dirs: Vec::new(),
            system_fonts: true,
        }
    }
}

/// A face chosen for one [`FontRole`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedFont {
    /// Family name written into the rendered text.
    pub family: String,
    /// Requested weight.
    pub weight: u16,
    /// Matching face in the database, if the database has one.
    pub face: Option<fontdb::ID>,
}

/// Strategy for turning a [`FontRole`] into a concrete face.
pub trait FontProvider {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Resolve `role` against `db`, or `None` when this provider cannot serve it.
    fn resolve(&self, db: &fontdb::Database, role: FontRole) -> Option<ResolvedFont>;
}

/// Looks up exact family names from [`FontPreferences`].
#[derive(Clone, Debug)]
pub struct NamedFontProvider {
    title: FontRequest,
    body: FontRequest,
}

impl NamedFontProvider {
    /// Provider for the preferred title/body pair.
    pub fn new(prefs: &FontPreferences) -> Self {
        Self {
            title: prefs.title.clone(),
            body: prefs.body.clone(),
        }
    }
}

impl FontProvider for NamedFontProvider {
    fn name(&self) -> &'static str {
        "named"
    }

    fn resolve(&self, db: &fontdb::Database, role: FontRole) -> Option<ResolvedFont> {
        let req = match role {
            FontRole::Title => &self.title,
            FontRole::Body => &self.body,
        };
        let families = [fontdb::Family::Name(&req.family)];
        let id = db.query(&query(&families, req.weight))?;
        Some(ResolvedFont {
            family: req.family.clone(),
            weight: req.weight,
            face: Some(id),
        })
    }
}

/// Last-resort provider: the generic sans-serif face, else any face, else the bare generic
/// family name. Always resolves.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinFontProvider;

impl FontProvider for BuiltinFontProvider {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn resolve(&self, db: &fontdb::Database, role: FontRole) -> Option<ResolvedFont> {
        Some(self.resolve_role(db, role))
    }
}

impl BuiltinFontProvider {
    /// Face for `role`; never fails.
    pub fn resolve_role(&self, db: &fontdb::Database, role: FontRole) -> ResolvedFont {
        let weight = match role {
            FontRole::Title => 700,
            FontRole::Body => 400,
        };
        let face = db
            .query(&query(&[fontdb::Family::SansSerif], weight))
            .or_else(|| db.faces().next().map(|f| f.id));
        let family = face
            .and_then(|id| db.face(id))
            .and_then(|info| info.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| GENERIC_SANS.to_owned());
        ResolvedFont {
            family,
            weight,
            face,
        }
    }

    /// Title and body pair served by this provider.
    pub fn font_set(&self, db: &fontdb::Database) -> FontSet {
        FontSet {
            provider: self.name(),
            title: self.resolve_role(db, FontRole::Title),
            body: self.resolve_role(db, FontRole::Body),
        }
    }
}

/// Title and body faces chosen together from one provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontSet {
    /// Provider that served both roles.
    pub provider: &'static str,
    /// Title face.
    pub title: ResolvedFont,
    /// Body face.
    pub body: ResolvedFont,
}

impl FontSet {
    /// First provider that resolves both roles wins.
    pub fn probe(db: &fontdb::Database, providers: &[&dyn FontProvider]) -> Option<Self> {
        providers.iter().find_map(|p| {
            let title = p.resolve(db, FontRole::Title)?;
            let body = p.resolve(db, FontRole::Body)?;
            Some(Self {
                provider: p.name(),
                title,
                body,
            })
        })
    }

    /// Preferred fonts, falling back to [`BuiltinFontProvider`].
    pub fn resolve(db: &fontdb::Database, prefs: &FontPreferences) -> Self {
        let named = NamedFontProvider::new(prefs);
        let set = Self::probe(db, &[&named]).unwrap_or_else(|| BuiltinFontProvider.font_set(db));
        if set.provider != named.name() {
            tracing::warn!(
                title = %prefs.title.family,
                body = %prefs.body.family,
                fallback = %set.title.family,
                "preferred fonts unavailable, using built-in default"
            );
        }
        set
    }

    /// Face for `role`.
    pub fn for_role(&self, role: FontRole) -> &ResolvedFont {
        match role {
            FontRole::Title => &self.title,
            FontRole::Body => &self.body,
        }
    }
}

fn query<'a>(families: &'a [fontdb::Family<'a>], weight: u16) -> fontdb::Query<'a> {
    fontdb::Query {
        families,
        weight: fontdb::Weight(weight),
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    }
}

/// Build the font database for `prefs`: system fonts (optional) plus every configured font
/// directory.
pub fn build_font_database(prefs: &FontPreferences) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    if prefs.system_fonts {
        db.load_system_fonts();
    }
    for dir in &prefs.font_dirs {
        load_fonts_from_dir(&mut db, dir);
    }
    tracing::debug!(faces = db.len(), "font database ready");
    db
}

fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory not readable, skipping");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to load font file");
        }
    }
}

/// `usvg` font resolver that never leaves text without a face while the database has one:
/// requested families first, then the generic families, then the first face.
pub fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, db| {
            let mut families = Vec::<fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => fontdb::Family::Name(s),
                });
            }
            families.push(fontdb::Family::SansSerif);
            families.push(fontdb::Family::Serif);
            families.push(fontdb::Family::Monospace);

            let style = match font.style() {
                usvg::FontStyle::Normal => fontdb::Style::Normal,
                usvg::FontStyle::Italic => fontdb::Style::Italic,
                usvg::FontStyle::Oblique => fontdb::Style::Oblique,
            };

            let q = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: fontdb::Stretch::Normal,
                style,
            };

            db.query(&q).or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
