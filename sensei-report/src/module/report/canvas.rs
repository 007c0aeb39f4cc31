///! Drawing surface
///!
///! Draw calls are recorded as operations, written out as one SVG document
///! and rasterized with resvg onto a pixmap filled with the background.

use super::fonts::{FALLBACK_FAMILY, ResolvedFont};
use super::theme::Rgb;
use crate::error::{RenderError, Result};
use resvg::tiny_skia;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use usvg::fontdb::Database;
use usvg::{Options, Tree};

/// Baseline offset from the top of a text line, as a fraction of font size
const ASCENT_RATIO: f32 = 0.8;

/// A string placed on the canvas. `x`/`y` is the top-left of the line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
    pub family: String,
}

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    Text(TextRun),
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        width: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        stroke: f32,
    },
}

/// Blank canvas owned by a single render
pub struct Canvas {
    width: u32,
    height: u32,
    background: Rgb,
    fontdb: Arc<Database>,
    ops: Vec<DrawOp>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb, fontdb: Arc<Database>) -> Self {
        Self {
            width,
            height,
            background,
            fontdb,
            ops: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Text placed so far, in draw order
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }

    /// Draw `text` with its top-left corner at (`x`, `y`)
    pub fn text(&mut self, x: f32, y: f32, text: &str, font: &ResolvedFont, color: Rgb) {
        self.ops.push(DrawOp::Text(TextRun {
            text: text.to_string(),
            x,
            y,
            size: font.size,
            bold: font.bold,
            italic: font.italic,
            color,
            family: font.family.clone(),
        }));
    }

    /// Draw `text` so that it ends at `right`
    pub fn text_right(&mut self, right: f32, y: f32, text: &str, font: &ResolvedFont, color: Rgb) {
        let width = self.measure(text, font);
        self.text(right - width, y, text, font, color);
    }

    /// Draw `text` horizontally centred on `center`
    pub fn text_centered(&mut self, center: f32, y: f32, text: &str, font: &ResolvedFont, color: Rgb) {
        let width = self.measure(text, font);
        self.text(center - width / 2.0, y, text, font, color);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, width: f32) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2, color, width });
    }

    /// Outlined rectangle, no fill
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb, stroke: f32) {
        self.ops.push(DrawOp::Rect { x, y, width, height, color, stroke });
    }

    /// Rendered width of `text` in pixels.
    ///
    /// Lays the string out through usvg with the shared font database. Falls
    /// back to the font's approximate advance when no glyphs could be shaped.
    pub fn measure(&self, text: &str, font: &ResolvedFont) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        if font.is_builtin() {
            return font.approx_width(text);
        }
        match self.layout_width(text, font) {
            Some(width) => width,
            None => {
                tracing::trace!("Could not lay out {:?}, estimating width", text);
                font.approx_width(text)
            }
        }
    }

    fn layout_width(&self, text: &str, font: &ResolvedFont) -> Option<f32> {
        let run = TextRun {
            text: text.to_string(),
            x: 0.0,
            y: 0.0,
            size: font.size,
            bold: font.bold,
            italic: font.italic,
            color: Rgb::BLACK,
            family: font.family.clone(),
        };

        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            self.width, self.height
        );
        push_text(&mut svg, &run);
        svg.push_str("</svg>");

        let tree = Tree::from_str(&svg, &self.options()).ok()?;
        let root = tree.root();
        if !root.has_children() {
            return None;
        }
        let width = root.bounding_box().width();
        (width > 0.0).then_some(width)
    }

    fn options(&self) -> Options<'static> {
        let mut options = Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        options
    }

    /// SVG document of every recorded operation, in draw order
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );
        let _ = writeln!(
            svg,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.width,
            self.height,
            self.background.to_hex()
        );

        for op in &self.ops {
            match op {
                DrawOp::Text(run) => push_text(&mut svg, run),
                DrawOp::Line { x1, y1, x2, y2, color, width } => {
                    let _ = write!(
                        svg,
                        r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}"/>"#,
                        x1, y1, x2, y2, color.to_hex(), width
                    );
                }
                DrawOp::Rect { x, y, width, height, color, stroke } => {
                    let _ = write!(
                        svg,
                        r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="{:.1}"/>"#,
                        x, y, width, height, color.to_hex(), stroke
                    );
                }
            }
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize every operation onto a fresh pixmap
    pub fn rasterize(self) -> Result<RasterImage> {
        let svg = self.to_svg();
        let tree = Tree::from_str(&svg, &self.options())?;

        let mut pixmap = tiny_skia::Pixmap::new(self.width, self.height).ok_or(RenderError::Canvas {
            width: self.width,
            height: self.height,
        })?;
        pixmap.fill(self.background.to_skia());
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let texts = self
            .ops
            .into_iter()
            .filter_map(|op| match op {
                DrawOp::Text(run) => Some(run),
                _ => None,
            })
            .collect();

        Ok(RasterImage {
            pixmap,
            texts,
            output_path: None,
        })
    }
}

fn push_text(svg: &mut String, run: &TextRun) {
    let family = if run.family == FALLBACK_FAMILY {
        run.family.clone()
    } else {
        let bare: String = run.family.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
        format!("'{}'", escape_xml(&bare))
    };
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" font-family="{}" font-size="{:.1}" font-weight="{}" font-style="{}" fill="{}" xml:space="preserve">{}</text>"#,
        run.x,
        run.y + run.size * ASCENT_RATIO,
        family,
        run.size,
        if run.bold { "bold" } else { "normal" },
        if run.italic { "italic" } else { "normal" },
        run.color.to_hex(),
        escape_xml(&run.text)
    );
}

/// Escape markup characters. Code points XML cannot carry become U+FFFD.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' | '\n' | '\r' => escaped.push(c),
            c if is_xml_char(c) => escaped.push(c),
            _ => escaped.push(char::REPLACEMENT_CHARACTER),
        }
    }
    escaped
}

fn is_xml_char(c: char) -> bool {
    !(c < '\u{20}' || c == '\u{FFFE}' || c == '\u{FFFF}')
}

/// Rendered report: the pixels plus every text run that was placed
#[derive(Debug)]
pub struct RasterImage {
    pixmap: tiny_skia::Pixmap,
    texts: Vec<TextRun>,
    output_path: Option<PathBuf>,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    /// Colour at (`x`, `y`); the canvas is opaque so no un-premultiply is needed
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap
            .pixel(x, y)
            .map(|p| Rgb(p.red(), p.green(), p.blue()))
    }

    /// Text runs in draw order
    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// First run whose text equals `text`
    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.texts.iter().find(|run| run.text == text)
    }

    /// First run whose text starts with `prefix`
    pub fn find_text_starting_with(&self, prefix: &str) -> Option<&TextRun> {
        self.texts.iter().find(|run| run.text.starts_with(prefix))
    }

    /// Path of the last successful [`RasterImage::save_png`]
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }

    /// Encode and write the image with a single filesystem write
    pub fn save_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.encode_png()?;
        std::fs::write(path, data).map_err(|source| RenderError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
        self.output_path = Some(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::report::fonts::{FontRequest, FontResolver};

    fn empty_canvas(width: u32, height: u32, background: Rgb) -> (Canvas, FontResolver) {
        let resolver = FontResolver::empty();
        let canvas = Canvas::new(width, height, background, Arc::clone(resolver.database()));
        (canvas, resolver)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Fees & <Taxes>"), "Fees &amp; &lt;Taxes&gt;");
        assert_eq!(escape_xml(r#""a" 'b'"#), "&quot;a&quot; &apos;b&apos;");
    }

    #[test]
    fn test_escape_xml_replaces_illegal_chars() {
        assert_eq!(escape_xml("Paid\u{1}in advance"), "Paid\u{FFFD}in advance");
        assert_eq!(escape_xml("a\u{FFFE}b\u{FFFF}"), "a\u{FFFD}b\u{FFFD}");
        assert_eq!(escape_xml("tab\tline\n"), "tab\tline\n");
    }

    #[test]
    fn test_family_quotes_are_stripped() {
        let (mut canvas, resolver) = empty_canvas(200, 100, Rgb::WHITE);
        let mut font = resolver.resolve(FontRequest::regular(20.0));
        font.family = "O'Neil \"Sans\"".to_string();
        canvas.text(0.0, 0.0, "x", &font, Rgb::BLACK);

        let svg = canvas.to_svg();
        assert!(svg.contains(r#"font-family="'ONeil Sans'""#));
        assert!(Tree::from_str(&svg, &canvas.options()).is_ok());
    }

    #[test]
    fn test_svg_contains_ops_in_order() {
        let (mut canvas, resolver) = empty_canvas(200, 100, Rgb::WHITE);
        let font = resolver.resolve(FontRequest::bold(20.0));
        canvas.text(10.0, 10.0, "Cierre & Co", &font, Rgb::BLACK);
        canvas.line(0.0, 50.0, 200.0, 50.0, Rgb::BLACK, 2.0);
        canvas.rect(5.0, 5.0, 50.0, 20.0, Rgb::BLACK, 3.0);

        let svg = canvas.to_svg();
        assert!(svg.contains(r##"fill="#FFFFFF""##));
        assert!(svg.contains("Cierre &amp; Co"));
        assert!(svg.contains(r#"font-weight="bold""#));
        let text_at = svg.find("<text").unwrap();
        let line_at = svg.find("<line").unwrap();
        let rect_at = svg.rfind("<rect").unwrap();
        assert!(text_at < line_at && line_at < rect_at);
    }

    #[test]
    fn test_text_right_ends_at_margin() {
        let (mut canvas, resolver) = empty_canvas(400, 100, Rgb::WHITE);
        let font = resolver.resolve(FontRequest::regular(20.0));
        canvas.text_right(380.0, 10.0, "Prepared: 12/1/2025", &font, Rgb::BLACK);

        let image = canvas.rasterize().unwrap();
        let run = image.find_text("Prepared: 12/1/2025").unwrap();
        let expected = 380.0 - font.approx_width("Prepared: 12/1/2025");
        assert!((run.x - expected).abs() < 0.01);
    }

    #[test]
    fn test_text_centered() {
        let (mut canvas, resolver) = empty_canvas(400, 100, Rgb::WHITE);
        let font = resolver.resolve(FontRequest::regular(20.0));
        canvas.text_centered(200.0, 10.0, "abcd", &font, Rgb::BLACK);
        let image = canvas.rasterize().unwrap();
        let run = image.find_text("abcd").unwrap();
        assert!((run.x + font.approx_width("abcd") / 2.0 - 200.0).abs() < 0.01);
    }

    #[test]
    fn test_rasterize_fills_background() {
        let (mut canvas, _) = empty_canvas(64, 32, Rgb(0x12, 0x12, 0x12));
        canvas.line(0.0, 16.0, 64.0, 16.0, Rgb::WHITE, 2.0);
        let image = canvas.rasterize().unwrap();
        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 32);
        assert_eq!(image.pixel(1, 1), Some(Rgb(0x12, 0x12, 0x12)));
        assert_eq!(image.pixel(32, 16), Some(Rgb::WHITE));
        assert!(image.pixel(64, 0).is_none());
        assert!(image.pixel(0, 32).is_none());
        assert!(image.pixel(63, 31).is_some());
    }

    #[test]
    fn test_measure_empty_is_zero() {
        let (canvas, resolver) = empty_canvas(10, 10, Rgb::WHITE);
        let font = resolver.resolve(FontRequest::regular(20.0));
        assert_eq!(canvas.measure("", &font), 0.0);
    }

    #[test]
    fn test_save_png_reports_bad_path() {
        let (canvas, _) = empty_canvas(8, 8, Rgb::WHITE);
        let mut image = canvas.rasterize().unwrap();
        let err = image
            .save_png("/nonexistent/dir/report.png")
            .unwrap_err();
        assert!(matches!(err, RenderError::Persist { .. }));
        assert!(image.output_path().is_none());
    }
}
