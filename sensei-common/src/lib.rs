pub mod types;

pub use types::{LineItem, ReportInput, SizeVariant, SummaryField, Theme};
