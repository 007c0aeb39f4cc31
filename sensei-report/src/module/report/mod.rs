///! Closing-cost report rendering
///!
///! Turns a [`ReportInput`](sensei_common::ReportInput) into a PNG image.
///!
///! ## Main Components
///! - `ReportRenderer`: single-pass renderer driven by a `LayoutProfile`
///! - `FontResolver`: ordered font lookup with a built-in fallback
///! - `Canvas`: records draw calls and rasterizes them with resvg

// ============ Formatting ============
mod format;
pub use format::{
    RANGE_SEPARATOR, format_amount_range, format_currency, format_currency_span,
    format_percent, format_percent_span, format_prepared_date, prepared_date_or_today,
};

// ============ Presentation ============
mod theme;
pub use theme::{Palette, Rgb};

mod layout;
pub use layout::{
    Align, DatePlacement, FontSizes, LayoutFamily, LayoutProfile, SingleColumnLayout,
    TwoColumnLayout,
};

// ============ Drawing Surface ============
mod fonts;
pub use fonts::{FontRequest, FontResolver, FontSource, ResolvedFont, NAMED_FAMILIES};

mod canvas;
pub use canvas::{Canvas, RasterImage, TextRun};

// ============ Rendering System ============
mod renderer;
pub use renderer::{DEFAULT_OUTPUT_FILENAME, RenderOptions, ReportRenderer, render_report};

mod sample;
pub use sample::sample_input;
