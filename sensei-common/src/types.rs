use serde::{Deserialize, Serialize};

/// Colour theme applied uniformly to one report render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "dark")]
    Dark,
    #[serde(rename = "light")]
    Light,
    /// Fixed-palette presentation layout with its own canvas size
    #[serde(rename = "mockup")]
    Mockup,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Mockup => "mockup",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            "mockup" => Ok(Theme::Mockup),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Canvas size profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SizeVariant {
    /// US Letter at 300 dpi, two-column layout
    #[default]
    #[serde(rename = "letter")]
    Letter,
    /// Fixed-pixel single-column layout
    #[serde(rename = "compact")]
    Compact,
}

impl SizeVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeVariant::Letter => "letter",
            SizeVariant::Compact => "compact",
        }
    }

    /// Theme used when the caller does not pick one
    pub fn default_theme(&self) -> Theme {
        match self {
            SizeVariant::Letter => Theme::Light,
            SizeVariant::Compact => Theme::Dark,
        }
    }
}

impl std::fmt::Display for SizeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SizeVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "letter" => Ok(SizeVariant::Letter),
            "compact" => Ok(SizeVariant::Compact),
            _ => Err(format!("Unknown size variant: {}", s)),
        }
    }
}

/// One `label: value` row of the purchase summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryField {
    /// e.g. "Purchase Price"
    pub label: String,
    /// e.g. "$500,000 USD"
    pub value: String,
}

impl SummaryField {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One fee row of the estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub min_amount: f64,
    pub max_amount: f64,
    /// Free-form note; empty means no note is drawn
    #[serde(default)]
    pub note: String,
}

impl LineItem {
    pub fn new(description: impl Into<String>, min_amount: f64, max_amount: f64, note: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            min_amount,
            max_amount,
            note: note.into(),
        }
    }

    /// A fixed fee renders as one amount instead of a range
    pub fn is_fixed(&self) -> bool {
        self.min_amount == self.max_amount
    }
}

/// Everything a closing-cost report shows.
///
/// Collections render in the order given. Ranges are not validated, so
/// `estimate_min > estimate_max` is rendered as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    /// Ordered summary rows (insertion order is rendering order)
    #[serde(default)]
    pub purchase_summary: Vec<SummaryField>,
    #[serde(default)]
    pub addons: Vec<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    pub estimate_min: f64,
    pub estimate_max: f64,
    pub effective_min_pct: f64,
    pub effective_max_pct: f64,
    /// `M/D/YYYY`; today's date when absent
    #[serde(default)]
    pub prepared_date: Option<String>,
    #[serde(default)]
    pub sponsor_text: Option<String>,
}

impl ReportInput {
    /// Sponsor line, if there is anything to draw
    pub fn sponsor(&self) -> Option<&str> {
        self.sponsor_text.as_deref().filter(|s| !s.is_empty())
    }
}
