///! Closing-cost report renderer
///!
///! One top-to-bottom pass per render. Each section draws at the current
///! cursor and advances it; nothing is reflowed afterwards.

use super::canvas::{Canvas, RasterImage};
use super::fonts::{FontRequest, FontResolver, ResolvedFont};
use super::format::{
    format_amount_range, format_currency_span, format_percent_span, prepared_date_or_today,
};
use super::layout::{
    Align, DatePlacement, FontSizes, LayoutFamily, LayoutProfile, SingleColumnLayout,
    TwoColumnLayout,
};
use super::theme::Palette;
use crate::error::Result;
use sensei_common::{LineItem, ReportInput, SizeVariant, Theme};
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_OUTPUT_FILENAME: &str = "cierre_sensei_report.png";

const TITLE_TEXT: &str = "Cierre Sensei";
const SUBTITLE_TEXT: &str = "Closing Costs Estimation";
const DISCLAIMER_TEXT: &str = "Estimate only. Actual closing costs may vary.";

/// Presentation choices for one render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// `None` picks the size variant's default theme
    pub theme: Option<Theme>,
    pub output_filename: PathBuf,
    pub size_variant: SizeVariant,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: None,
            output_filename: PathBuf::from(DEFAULT_OUTPUT_FILENAME),
            size_variant: SizeVariant::default(),
        }
    }
}

impl RenderOptions {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_filename = path.into();
        self
    }

    pub fn with_size_variant(mut self, size_variant: SizeVariant) -> Self {
        self.size_variant = size_variant;
        self
    }

    pub fn resolved_theme(&self) -> Theme {
        self.theme.unwrap_or_else(|| self.size_variant.default_theme())
    }
}

/// Every font a render needs, resolved once up front
struct FontSet {
    title: ResolvedFont,
    subtitle: ResolvedFont,
    heading: ResolvedFont,
    body: ResolvedFont,
    small_bold: ResolvedFont,
    totals_label: ResolvedFont,
    totals_value: ResolvedFont,
    footer: ResolvedFont,
}

impl FontSet {
    fn resolve(resolver: &FontResolver, sizes: &FontSizes) -> Self {
        Self {
            title: resolver.resolve(FontRequest::bold(sizes.title)),
            subtitle: resolver.resolve(FontRequest::regular(sizes.subtitle)),
            heading: resolver.resolve(FontRequest::bold(sizes.heading)),
            body: resolver.resolve(FontRequest::regular(sizes.body)),
            small_bold: resolver.resolve(FontRequest::bold(sizes.small)),
            totals_label: resolver.resolve(FontRequest::bold(sizes.totals)),
            totals_value: resolver.resolve(FontRequest::regular(sizes.totals)),
            footer: resolver.resolve(FontRequest::italic(sizes.footer)),
        }
    }
}

/// Renders closing-cost reports to PNG
#[derive(Clone)]
pub struct ReportRenderer {
    fonts: FontResolver,
}

impl ReportRenderer {
    pub fn new(fonts: FontResolver) -> Self {
        Self { fonts }
    }

    /// Render `input`, write it to `options.output_filename` and return it.
    ///
    /// Write failures are returned as-is; nothing is retried.
    pub fn render(&self, input: &ReportInput, options: &RenderOptions) -> Result<RasterImage> {
        let canvas = self.layout(input, options);
        let mut image = canvas.rasterize()?;
        image.save_png(&options.output_filename)?;

        tracing::info!("Generated closing cost report: {:?}", options.output_filename);
        Ok(image)
    }

    /// Lay out every section without rasterizing
    pub(crate) fn layout(&self, input: &ReportInput, options: &RenderOptions) -> Canvas {
        let theme = options.resolved_theme();
        let profile = LayoutProfile::select(options.size_variant, theme);
        let palette = Palette::for_theme(theme);

        tracing::debug!(
            "Rendering {} report ({} theme, {} line items, {} add-ons)",
            profile.name,
            theme,
            input.line_items.len(),
            input.addons.len()
        );

        let canvas = Canvas::new(
            profile.width,
            profile.height,
            palette.background,
            Arc::clone(self.fonts.database()),
        );
        let mut pass = ReportPass {
            input,
            profile,
            palette,
            fonts: FontSet::resolve(&self.fonts, &profile.fonts),
            canvas,
        };
        let prepared = format!(
            "Prepared: {}",
            prepared_date_or_today(input.prepared_date.as_deref())
        );
        pass.run(&prepared);
        pass.canvas
    }
}

/// Render with fonts loaded from the host
pub fn render_report(input: &ReportInput, options: &RenderOptions) -> Result<RasterImage> {
    ReportRenderer::new(FontResolver::load(None, true)).render(input, options)
}

/// State of one render pass
struct ReportPass<'a> {
    input: &'a ReportInput,
    profile: &'static LayoutProfile,
    palette: Palette,
    fonts: FontSet,
    canvas: Canvas,
}

impl ReportPass<'_> {
    fn run(&mut self, prepared: &str) {
        let input = self.input;
        let mut current_y = self.profile.margin_y;

        self.emit_header(prepared, &mut current_y);
        self.emit_subtitle(&mut current_y);

        match self.profile.family {
            LayoutFamily::TwoColumn(columns) => {
                self.emit_two_columns(&columns, &mut current_y);
                self.emit_fee_table(&columns, &mut current_y);
                current_y += self.profile.row_height() * self.profile.totals_gap_rows;
                self.emit_totals(&mut current_y);
            }
            LayoutFamily::SingleColumn(flow) => {
                self.emit_summary_lines(&mut current_y);
                self.emit_rule(&flow, &mut current_y);
                self.emit_heading("Fee Breakdown", &flow, &mut current_y);
                for item in &input.line_items {
                    self.emit_fee_row(item, true, &mut current_y);
                }
                self.emit_rule(&flow, &mut current_y);
                self.emit_totals(&mut current_y);
                self.emit_rule(&flow, &mut current_y);
                self.emit_heading("Add-Ons Included", &flow, &mut current_y);
                self.emit_addon_lines(&flow, &mut current_y);
            }
        }

        self.emit_sponsor();
        self.emit_footer(prepared);
    }

    fn emit_header(&mut self, prepared: &str, current_y: &mut f32) {
        let profile = self.profile;

        match profile.title_align {
            Align::Left => self.canvas.text(
                profile.margin_x,
                *current_y,
                TITLE_TEXT,
                &self.fonts.title,
                self.palette.title,
            ),
            Align::Center => self.canvas.text_centered(
                profile.width as f32 / 2.0,
                *current_y,
                TITLE_TEXT,
                &self.fonts.title,
                self.palette.title,
            ),
        }

        if profile.date_placement == DatePlacement::Header {
            self.canvas.text_right(
                profile.content_right(),
                *current_y + profile.date_nudge,
                prepared,
                &self.fonts.small_bold,
                self.palette.body,
            );
        }

        *current_y += profile.fonts.title + profile.header_gap;
    }

    fn emit_subtitle(&mut self, current_y: &mut f32) {
        let profile = self.profile;

        match profile.title_align {
            Align::Left => self.canvas.text(
                profile.margin_x,
                *current_y,
                SUBTITLE_TEXT,
                &self.fonts.subtitle,
                self.palette.title,
            ),
            Align::Center => self.canvas.text_centered(
                profile.width as f32 / 2.0,
                *current_y,
                SUBTITLE_TEXT,
                &self.fonts.subtitle,
                self.palette.title,
            ),
        }

        *current_y += profile.fonts.subtitle + profile.header_gap;
    }

    /// Add-ons on the left, summary box on the right. The cursor ends below
    /// whichever column is taller.
    fn emit_two_columns(&mut self, columns: &TwoColumnLayout, current_y: &mut f32) {
        let profile = self.profile;
        let input = self.input;

        // Left: add-ons
        let mut addons_y = *current_y;
        self.canvas.text(
            profile.margin_x,
            addons_y,
            "Addons:",
            &self.fonts.body,
            self.palette.body,
        );
        addons_y += profile.fonts.body + columns.label_gap;

        for addon in &input.addons {
            self.canvas.text(
                profile.margin_x + columns.bullet_indent,
                addons_y,
                &format!("• {}", addon),
                &self.fonts.body,
                self.palette.body,
            );
            addons_y += profile.line_height();
        }
        let addons_bottom = addons_y;

        // Right: purchase summary box
        let box_x = profile.content_right() - columns.box_width;
        let box_y = *current_y;
        let line_height = profile.fonts.body + columns.box_line_gap;
        let box_height = line_height * input.purchase_summary.len() as f32 + columns.box_padding;

        self.canvas.rect(
            box_x,
            box_y,
            columns.box_width,
            box_height,
            self.palette.box_outline,
            columns.box_stroke,
        );

        let mut text_y = box_y + columns.box_inset_y;
        for field in &input.purchase_summary {
            self.canvas.text(
                box_x + columns.box_inset_x,
                text_y,
                &format!("{}:  {}", field.label, field.value),
                &self.fonts.body,
                self.palette.body,
            );
            text_y += line_height;
        }
        let summary_bottom = box_y + box_height;

        *current_y = addons_bottom.max(summary_bottom) + columns.block_spacing;
    }

    fn emit_fee_table(&mut self, columns: &TwoColumnLayout, current_y: &mut f32) {
        let profile = self.profile;
        let headers = [
            (0.0, "Description"),
            (profile.amount_offset, "Amount"),
            (profile.note_offset, "Notes"),
        ];

        for (offset, label) in headers {
            self.canvas.text(
                profile.margin_x + offset,
                *current_y,
                label,
                &self.fonts.small_bold,
                self.palette.title,
            );
        }
        *current_y += profile.fonts.small + columns.header_rule_gap;

        self.canvas.line(
            profile.margin_x,
            *current_y,
            profile.content_right(),
            *current_y,
            self.palette.separator,
            profile.rule_width,
        );
        *current_y += columns.header_rule_after;

        let input = self.input;
        for item in &input.line_items {
            self.emit_fee_row(item, false, current_y);
        }
    }

    fn emit_fee_row(&mut self, item: &LineItem, parenthesize_note: bool, current_y: &mut f32) {
        let profile = self.profile;

        self.canvas.text(
            profile.margin_x,
            *current_y,
            &item.description,
            &self.fonts.body,
            self.palette.body,
        );
        self.canvas.text(
            profile.margin_x + profile.amount_offset,
            *current_y,
            &format_amount_range(item.min_amount, item.max_amount),
            &self.fonts.body,
            self.palette.body,
        );

        if !item.note.is_empty() {
            let note = if parenthesize_note {
                format!("({})", item.note)
            } else {
                item.note.clone()
            };
            self.canvas.text(
                profile.margin_x + profile.note_offset,
                *current_y,
                &note,
                &self.fonts.body,
                self.palette.body,
            );
        }

        *current_y += profile.row_height();
    }

    fn emit_totals(&mut self, current_y: &mut f32) {
        let profile = self.profile;
        let rows = [
            (
                "Estimated Range:",
                format_currency_span(self.input.estimate_min, self.input.estimate_max),
            ),
            (
                "Effective Rate %:",
                format_percent_span(self.input.effective_min_pct, self.input.effective_max_pct),
            ),
        ];

        for (label, value) in rows {
            self.canvas.text(
                profile.margin_x,
                *current_y,
                label,
                &self.fonts.totals_label,
                self.palette.title,
            );
            self.canvas.text(
                profile.margin_x + profile.totals_value_offset,
                *current_y,
                &value,
                &self.fonts.totals_value,
                self.palette.body,
            );
            *current_y += profile.fonts.totals + profile.totals_line_gap;
        }
    }

    fn emit_summary_lines(&mut self, current_y: &mut f32) {
        let profile = self.profile;
        let input = self.input;

        for field in &input.purchase_summary {
            self.canvas.text(
                profile.margin_x,
                *current_y,
                &format!("{}:  {}", field.label, field.value),
                &self.fonts.body,
                self.palette.body,
            );
            *current_y += profile.line_height();
        }
    }

    fn emit_rule(&mut self, flow: &SingleColumnLayout, current_y: &mut f32) {
        let profile = self.profile;

        *current_y += flow.rule_gap;
        self.canvas.line(
            profile.margin_x,
            *current_y,
            profile.content_right(),
            *current_y,
            self.palette.separator,
            profile.rule_width,
        );
        *current_y += flow.rule_gap;
    }

    fn emit_heading(&mut self, heading: &str, flow: &SingleColumnLayout, current_y: &mut f32) {
        self.canvas.text(
            self.profile.margin_x,
            *current_y,
            heading,
            &self.fonts.heading,
            self.palette.title,
        );
        *current_y += self.profile.fonts.heading + flow.heading_gap;
    }

    fn emit_addon_lines(&mut self, flow: &SingleColumnLayout, current_y: &mut f32) {
        let profile = self.profile;
        let input = self.input;

        for addon in &input.addons {
            self.canvas.text(
                profile.margin_x + flow.addon_indent,
                *current_y,
                &format!("• {}", addon),
                &self.fonts.body,
                self.palette.body,
            );
            *current_y += profile.line_height();
        }
    }

    fn emit_sponsor(&mut self) {
        let input = self.input;
        let Some(sponsor) = input.sponsor() else {
            return;
        };
        self.canvas.text_centered(
            self.profile.width as f32 / 2.0,
            self.profile.sponsor_y,
            sponsor,
            &self.fonts.body,
            self.palette.title,
        );
    }

    fn emit_footer(&mut self, prepared: &str) {
        let profile = self.profile;

        if profile.date_placement == DatePlacement::Footer {
            self.canvas.text(
                profile.margin_x,
                profile.footer_y,
                prepared,
                &self.fonts.small_bold,
                self.palette.body,
            );
        }

        self.canvas.text_right(
            profile.content_right(),
            profile.footer_y,
            DISCLAIMER_TEXT,
            &self.fonts.footer,
            self.palette.body,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::module::report::canvas::TextRun;
    use crate::module::report::sample::sample_input;
    use crate::module::report::theme::Rgb;
    use tempfile::TempDir;

    fn renderer() -> ReportRenderer {
        ReportRenderer::new(FontResolver::load(None, true))
    }

    fn texts(canvas: &Canvas) -> Vec<TextRun> {
        canvas.text_runs().cloned().collect()
    }

    fn position(runs: &[TextRun], text: &str) -> usize {
        runs.iter()
            .position(|run| run.text == text)
            .unwrap_or_else(|| panic!("missing text run {:?}", text))
    }

    #[test]
    fn test_sample_report_letter() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("cierre_sensei_report.png");
        let options = RenderOptions::default().with_output(&output);

        let image = renderer().render(&sample_input(), &options).unwrap();

        assert!(output.exists());
        assert_eq!(image.output_path(), Some(output.as_path()));
        assert_eq!((image.width(), image.height()), (2550, 3300));
        assert!(image.find_text("Prepared: 12/1/2025").is_some());
        assert!(image.find_text_starting_with("• ").is_some());
        assert_eq!(image.pixel(5, 5), Some(Rgb::WHITE));
        assert_eq!(
            image.find_text("Estimated Range:").map(|r| r.bold),
            Some(true)
        );
        assert!(image.find_text("$29,140 – $34,960").is_some());
        assert!(image.find_text("5.8% – 7.0%").is_some());
    }

    #[test]
    fn test_dark_compact_report() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("dark.png");
        let options = RenderOptions::default()
            .with_size_variant(SizeVariant::Compact)
            .with_output(&output);
        assert_eq!(options.resolved_theme(), Theme::Dark);

        let image = renderer().render(&sample_input(), &options).unwrap();

        assert!(output.exists());
        assert_eq!((image.width(), image.height()), (1275, 1650));
        assert_eq!(image.pixel(5, 5), Some(Palette::DARK.background));
        assert!(image.find_text("Prepared: 12/1/2025").is_some());
    }

    #[test]
    fn test_mockup_report() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("mockup.png");
        let options = RenderOptions::default()
            .with_theme(Theme::Mockup)
            .with_output(&output);

        let image = renderer().render(&sample_input(), &options).unwrap();

        assert_eq!((image.width(), image.height()), (1200, 1800));
        assert_eq!(image.pixel(5, 5), Some(Palette::MOCKUP.background));

        let prepared = image.find_text("Prepared: 12/1/2025").unwrap();
        assert_eq!(prepared.y, LayoutProfile::MOCKUP.footer_y);
        assert_eq!(prepared.x, LayoutProfile::MOCKUP.margin_x);
    }

    #[test]
    fn test_light_compact_background() {
        let temp_dir = TempDir::new().unwrap();
        let options = RenderOptions::default()
            .with_size_variant(SizeVariant::Compact)
            .with_theme(Theme::Light)
            .with_output(temp_dir.path().join("light.png"));

        let image = renderer().render(&sample_input(), &options).unwrap();
        assert_eq!(image.pixel(3, 3), Some(Rgb::WHITE));
    }

    #[test]
    fn test_render_is_reproducible_with_explicit_date() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("repeat.png");
        let options = RenderOptions::default()
            .with_size_variant(SizeVariant::Compact)
            .with_output(&output);
        let renderer = renderer();

        renderer.render(&sample_input(), &options).unwrap();
        let first = std::fs::read(&output).unwrap();
        renderer.render(&sample_input(), &options).unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_collections_render() {
        let temp_dir = TempDir::new().unwrap();
        let mut input = sample_input();
        input.addons.clear();
        input.line_items.clear();

        for (size, name) in [(SizeVariant::Compact, "compact.png"), (SizeVariant::Letter, "letter.png")] {
            let options = RenderOptions::default()
                .with_size_variant(size)
                .with_output(temp_dir.path().join(name));
            let canvas = renderer().layout(&input, &options);
            let runs = texts(&canvas);
            assert!(runs.iter().all(|run| !run.text.starts_with("• ")));
            assert!(runs.iter().all(|run| !run.text.starts_with('$') || run.text.contains('–')));
        }

        let options = RenderOptions::default()
            .with_size_variant(SizeVariant::Compact)
            .with_output(temp_dir.path().join("empty.png"));
        let image = renderer().render(&input, &options).unwrap();
        assert!(image.find_text("Fee Breakdown").is_some());
        assert!(image.find_text("Add-Ons Included").is_some());
    }

    #[test]
    fn test_range_collapsing_in_rows() {
        let options = RenderOptions::default().with_size_variant(SizeVariant::Compact);
        let runs = texts(&renderer().layout(&sample_input(), &options));

        assert!(runs.iter().any(|run| run.text == "$15,000"));
        assert!(runs.iter().any(|run| run.text == "$3,000 – $4,500"));
        assert!(!runs.iter().any(|run| run.text == "$750 – $750"));
        assert!(runs.iter().any(|run| run.text == "(Flat fee)"));
    }

    #[test]
    fn test_two_column_notes_are_not_parenthesized() {
        let runs = texts(&renderer().layout(&sample_input(), &RenderOptions::default()));
        assert!(runs.iter().any(|run| run.text == "Flat fee"));
        assert!(!runs.iter().any(|run| run.text == "(Flat fee)"));
    }

    #[test]
    fn test_rows_keep_input_order() {
        let options = RenderOptions::default().with_size_variant(SizeVariant::Compact);
        let runs = texts(&renderer().layout(&sample_input(), &options));

        let heading = position(&runs, "Fee Breakdown");
        let first = position(&runs, "ISAI 3%");
        let last = position(&runs, "Closing Coordinator");
        let totals = position(&runs, "Estimated Range:");
        let addons = position(&runs, "Add-Ons Included");
        assert!(heading < first && first < last && last < totals && totals < addons);

        let summary: Vec<&str> = runs
            .iter()
            .filter(|run| run.text.contains(":  "))
            .map(|run| run.text.as_str())
            .collect();
        assert_eq!(summary[0], "Purchase Price:  $500,000 USD");
        assert_eq!(summary[4], "Foreign Buyer:  Yes");
    }

    #[test]
    fn test_two_columns_reconcile_with_max() {
        let renderer = renderer();
        let options = RenderOptions::default();
        let mut input = sample_input();

        // Summary box is taller: 464 + 5 * 42 + 26 = 700
        input.addons.clear();
        let runs = texts(&renderer.layout(&input, &options));
        assert_eq!(runs[position(&runs, "Description")].y, 790.0);

        // Add-ons are taller: 464 + 34 + 12 + 10 * 44 = 950
        input.addons = (0..10).map(|i| format!("Add-on {}", i)).collect();
        let runs = texts(&renderer.layout(&input, &options));
        assert_eq!(runs[position(&runs, "Description")].y, 1040.0);
    }

    #[test]
    fn test_sponsor_only_when_non_empty() {
        let renderer = renderer();
        let options = RenderOptions::default().with_theme(Theme::Mockup);
        let mut input = sample_input();

        input.sponsor_text = Some(String::new());
        let runs = texts(&renderer.layout(&input, &options));
        assert!(!runs.iter().any(|run| run.y == LayoutProfile::MOCKUP.sponsor_y));

        input.sponsor_text = Some("Presented by Riviera Maya Title".to_string());
        let runs = texts(&renderer.layout(&input, &options));
        let sponsor = &runs[position(&runs, "Presented by Riviera Maya Title")];
        assert_eq!(sponsor.y, LayoutProfile::MOCKUP.sponsor_y);
    }

    #[test]
    fn test_header_date_right_aligned() {
        let renderer = ReportRenderer::new(FontResolver::empty());
        let runs = texts(&renderer.layout(&sample_input(), &RenderOptions::default()));
        let prepared = &runs[position(&runs, "Prepared: 12/1/2025")];
        let font = FontResolver::empty().resolve(FontRequest::bold(LayoutProfile::CLASSIC.fonts.small));
        let right = prepared.x + font.approx_width(&prepared.text);
        assert!((right - LayoutProfile::CLASSIC.content_right()).abs() < 0.01);
        assert_eq!(prepared.y, LayoutProfile::CLASSIC.margin_y + LayoutProfile::CLASSIC.date_nudge);
    }

    #[test]
    fn test_unordered_ranges_render_as_given() {
        let mut input = sample_input();
        input.estimate_min = 40000.0;
        input.estimate_max = 100.0;
        input.line_items = vec![LineItem::new("Refund", -500.0, -900.0, "")];
        let options = RenderOptions::default().with_size_variant(SizeVariant::Compact);
        let runs = texts(&renderer().layout(&input, &options));
        assert!(runs.iter().any(|run| run.text == "$40,000 – $100"));
        assert!(runs.iter().any(|run| run.text == "$-500 – $-900"));
    }

    #[test]
    fn test_default_date_is_today() {
        let mut input = sample_input();
        input.prepared_date = None;
        let options = RenderOptions::default().with_size_variant(SizeVariant::Compact);
        let runs = texts(&renderer().layout(&input, &options));
        let expected = format!("Prepared: {}", prepared_date_or_today(None));
        assert!(runs.iter().any(|run| run.text == expected));
    }

    #[test]
    fn test_control_characters_render() {
        let temp_dir = TempDir::new().unwrap();
        let mut input = sample_input();
        input.line_items[0].note = "Paid\u{1}in advance".to_string();
        input.purchase_summary[1].value = "Condo\u{7}\u{FFFF}".to_string();

        for (size, name) in [(SizeVariant::Compact, "compact.png"), (SizeVariant::Letter, "letter.png")] {
            let output = temp_dir.path().join(name);
            let options = RenderOptions::default()
                .with_size_variant(size)
                .with_output(&output);
            let image = renderer().render(&input, &options).unwrap();
            assert!(output.exists());
            assert!(image.texts().iter().any(|run| run.text.contains("Paid\u{1}in advance")));
        }
    }

    #[test]
    fn test_unwritable_output_is_an_error() {
        let options = RenderOptions::default()
            .with_size_variant(SizeVariant::Compact)
            .with_output("/nonexistent/dir/report.png");
        let err = renderer().render(&sample_input(), &options).unwrap_err();
        assert!(matches!(err, RenderError::Persist { .. }));
    }
}
