use anyhow::Context;
use sensei_common::{ReportInput, SizeVariant, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::module::report::{DEFAULT_OUTPUT_FILENAME, RenderOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for rolling log files
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Extra fonts loaded before the host fonts
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,

    #[serde(default = "default_load_system_fonts")]
    pub load_system_fonts: bool,

    #[serde(default = "default_output_filename")]
    pub output_filename: PathBuf,

    /// Overrides the size variant's default theme
    #[serde(default)]
    pub theme: Option<Theme>,

    #[serde(default)]
    pub size_variant: SizeVariant,

    /// TOML or JSON report input; the sample report when unset
    #[serde(default)]
    pub input: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

fn default_load_system_fonts() -> bool {
    true
}

fn default_output_filename() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILENAME)
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            fonts_dir: default_fonts_dir(),
            load_system_fonts: default_load_system_fonts(),
            output_filename: default_output_filename(),
            theme: None,
            size_variant: SizeVariant::default(),
            input: None,
        }
    }
}

impl RendererConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: RendererConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Read `path` if it exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            theme: self.theme,
            output_filename: self.output_filename.clone(),
            size_variant: self.size_variant,
        }
    }
}

/// Load a report input, JSON for `.json` files and TOML otherwise
pub fn load_input(path: impl AsRef<Path>) -> anyhow::Result<ReportInput> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report input '{}'", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let input = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON report input '{}'", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML report input '{}'", path.display()))?
    };
    Ok(input)
}
