pub mod config;
pub mod error;
pub mod logging;
pub mod module;

pub use error::RenderError;
pub use module::report::{RasterImage, RenderOptions, ReportRenderer, render_report};
pub use sensei_common::{LineItem, ReportInput, SizeVariant, SummaryField, Theme};
