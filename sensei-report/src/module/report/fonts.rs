///! Font resolution
///!
///! Every lookup is allowed to fail. Candidates are tried in order and the
///! built-in fallback always succeeds, so callers never see an error.

use std::path::Path;
use std::sync::Arc;
use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};

/// Families tried first, in order, with the requested weight and slant
pub const NAMED_FAMILIES: &[&str] = &["DejaVu Sans", "Arial", "Liberation Sans", "Roboto"];

/// Family name handed to the rasterizer when nothing else resolved
pub const FALLBACK_FAMILY: &str = "sans-serif";

/// Average advance of the fallback font, as a fraction of its size
const FALLBACK_ADVANCE_RATIO: f32 = 0.55;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontRequest {
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl FontRequest {
    pub fn regular(size: f32) -> Self {
        Self { size, bold: false, italic: false }
    }

    pub fn bold(size: f32) -> Self {
        Self { size, bold: true, italic: false }
    }

    pub fn italic(size: f32) -> Self {
        Self { size, bold: false, italic: true }
    }

    fn weight(&self) -> Weight {
        if self.bold { Weight::BOLD } else { Weight::NORMAL }
    }

    fn style(&self) -> Style {
        if self.italic { Style::Italic } else { Style::Normal }
    }
}

/// Where a resolved font came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    /// One of [`NAMED_FAMILIES`] with a matching style
    Named(ID),
    /// Generic sans-serif or serif face, style not guaranteed
    Generic(ID),
    /// Nothing in the database matched
    Builtin,
}

/// A font handle for one (size, style) request
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFont {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub source: FontSource,
}

impl ResolvedFont {
    fn builtin(request: FontRequest) -> Self {
        Self {
            family: FALLBACK_FAMILY.to_string(),
            size: request.size,
            bold: request.bold,
            italic: request.italic,
            source: FontSource::Builtin,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.source == FontSource::Builtin
    }

    /// Width estimate used when the text cannot be laid out
    pub fn approx_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size * FALLBACK_ADVANCE_RATIO
    }
}

/// Resolves font requests against a shared font database
#[derive(Clone)]
pub struct FontResolver {
    fontdb: Arc<Database>,
}

impl FontResolver {
    pub fn new(fontdb: Arc<Database>) -> Self {
        Self { fontdb }
    }

    /// Resolver with no faces at all; every request ends at the fallback
    pub fn empty() -> Self {
        Self::new(Arc::new(Database::new()))
    }

    /// Build the database from an optional font directory and the host fonts
    pub fn load(fonts_dir: Option<&Path>, load_system_fonts: bool) -> Self {
        let mut fontdb = Database::new();

        if let Some(dir) = fonts_dir {
            if dir.is_dir() {
                fontdb.load_fonts_dir(dir);
            } else {
                tracing::debug!("Font directory {:?} not found, skipping", dir);
            }
        }
        if load_system_fonts {
            fontdb.load_system_fonts();
        }

        tracing::debug!("Loaded {} font faces", fontdb.len());
        Self::new(Arc::new(fontdb))
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.fontdb
    }

    /// Resolve one font. Never fails.
    pub fn resolve(&self, request: FontRequest) -> ResolvedFont {
        for name in NAMED_FAMILIES {
            if let Some(id) = self.lookup(Family::Name(*name), request, true) {
                return self.resolved(id, request, FontSource::Named(id));
            }
            tracing::trace!("Font family '{}' unavailable for {:?}", name, request);
        }

        for generic in [Family::SansSerif, Family::Serif] {
            if let Some(id) = self.lookup(generic, request, false) {
                return self.resolved(id, request, FontSource::Generic(id));
            }
        }

        tracing::debug!("No font face for {:?}, using built-in fallback", request);
        ResolvedFont::builtin(request)
    }

    fn lookup(&self, family: Family<'_>, request: FontRequest, exact_style: bool) -> Option<ID> {
        let families = [family];
        let query = Query {
            families: &families,
            weight: request.weight(),
            stretch: Stretch::Normal,
            style: request.style(),
        };
        let id = self.fontdb.query(&query)?;

        if exact_style {
            let face = self.fontdb.face(id)?;
            let is_bold = face.weight.0 >= 600;
            let is_italic = face.style != Style::Normal;
            if is_bold != request.bold || is_italic != request.italic {
                return None;
            }
        }

        Some(id)
    }

    fn resolved(&self, id: ID, request: FontRequest, source: FontSource) -> ResolvedFont {
        let family = self
            .fontdb
            .face(id)
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| FALLBACK_FAMILY.to_string());

        ResolvedFont {
            family,
            size: request.size,
            bold: request.bold,
            italic: request.italic,
            source,
        }
    }
}
