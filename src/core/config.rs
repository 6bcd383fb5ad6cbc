//! Validated run configuration
//!
//! `SplitConfig` is built once from the CLI, the settings file and the
//! built-in defaults, in that order of precedence, then validated. The
//! pipeline never changes it.

use super::cli::CliArgs;
use super::config_file::ConfigFile;
use crate::charset::PriorityList;
use crate::errors::SplitError;
use crate::font_source::FontFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CHUNK_SIZE: usize = 200 * 1024;
pub const DEFAULT_CSS_FILE_NAME: &str = "result";
pub const DEFAULT_OUT_DIR: &str = "./build";
pub const DEFAULT_STYLE: &str = "normal";
pub const DEFAULT_DISPLAY: &str = "swap";

/// Accepted `font-display` values
pub const FONT_DISPLAY_VALUES: [&str; 5] = ["auto", "block", "swap", "fallback", "optional"];

/// `@font-face` descriptor overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CssOptions {
    /// Falls back to the font's family name when unset
    pub family: Option<String>,
    /// Falls back to the font's weight class when unset
    pub weight: Option<String>,
    pub style: String,
    pub display: String,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            family: None,
            weight: None,
            style: DEFAULT_STYLE.to_string(),
            display: DEFAULT_DISPLAY.to_string(),
        }
    }
}

/// Where glyph priority comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "path")]
pub enum PrioritySource {
    /// The built-in frequency order
    Builtin,
    File(PathBuf),
    /// Keep source glyph order
    Disabled,
}

impl PrioritySource {
    pub fn load(&self) -> anyhow::Result<PriorityList> {
        match self {
            PrioritySource::Builtin => Ok(PriorityList::default_list()),
            PrioritySource::File(path) => PriorityList::load(path),
            PrioritySource::Disabled => Ok(PriorityList::empty()),
        }
    }
}

/// Immutable input of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitConfig {
    pub source: PathBuf,
    /// Detected from the file contents when unset
    pub source_format: Option<FontFormat>,
    pub out_dir: PathBuf,
    pub target_format: FontFormat,
    pub css: CssOptions,
    /// Byte budget per chunk
    pub chunk_size: usize,
    /// Stylesheet name without the `.css` extension
    pub css_file_name: String,
    pub priority: PrioritySource,
    pub preview: bool,
    pub report: bool,
}

impl SplitConfig {
    /// Defaults for everything but the source path
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            source_format: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            target_format: FontFormat::default(),
            css: CssOptions::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            css_file_name: DEFAULT_CSS_FILE_NAME.to_string(),
            priority: PrioritySource::Builtin,
            preview: true,
            report: true,
        }
    }

    /// Merge CLI flags over settings file values over defaults, then validate.
    pub fn resolve(cli: &CliArgs, file: Option<ConfigFile>) -> Result<Self, SplitError> {
        let file = file.unwrap_or_default();
        let source = cli
            .source
            .clone()
            .ok_or_else(|| SplitError::Config("no source font given".to_string()))?;
        let defaults = Self::new(source);

        let priority = if cli.no_priority {
            PrioritySource::Disabled
        } else if let Some(path) = cli.priority.clone().or(file.priority) {
            PrioritySource::File(path)
        } else {
            defaults.priority
        };

        let config = Self {
            source_format: cli.source_format.or(file.source_format),
            out_dir: cli.out_dir.clone().or(file.out_dir).unwrap_or(defaults.out_dir),
            target_format: cli.format.or(file.format).unwrap_or(defaults.target_format),
            css: CssOptions {
                family: cli.family.clone().or(file.family),
                weight: cli.weight.clone().or(file.weight),
                style: cli.style.clone().or(file.style).unwrap_or(defaults.css.style),
                display: cli
                    .display
                    .clone()
                    .or(file.display)
                    .unwrap_or(defaults.css.display),
            },
            chunk_size: cli.chunk_size.or(file.chunk_size).unwrap_or(defaults.chunk_size),
            css_file_name: cli
                .css_file_name
                .clone()
                .or(file.css_file_name)
                .unwrap_or(defaults.css_file_name),
            priority,
            preview: !cli.no_preview && file.preview.unwrap_or(defaults.preview),
            report: !cli.no_report && file.report.unwrap_or(defaults.report),
            source: defaults.source,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field once, before any work starts.
    pub fn validate(&self) -> Result<(), SplitError> {
        let invalid = |message: String| -> Result<(), SplitError> {
            Err(SplitError::Config(message))
        };

        if self.chunk_size == 0 {
            return invalid("chunk size must be greater than zero".to_string());
        }
        if !is_plain_file_name(&self.css_file_name) {
            return invalid(format!(
                "css file name '{}' must be a plain file name",
                self.css_file_name
            ));
        }
        if !FONT_DISPLAY_VALUES.contains(&self.css.display.as_str()) {
            return invalid(format!(
                "font-display '{}' is not one of {}",
                self.css.display,
                FONT_DISPLAY_VALUES.join(", ")
            ));
        }
        if self.css.style.trim().is_empty() {
            return invalid("font-style must not be empty".to_string());
        }
        if matches!(&self.css.family, Some(family) if family.trim().is_empty()) {
            return invalid("font family must not be empty".to_string());
        }
        if !self.source.is_file() {
            return invalid(format!(
                "source font {} does not exist",
                self.source.display()
            ));
        }
        Ok(())
    }

    /// `<out_dir>/<css_file_name>.css`
    pub fn stylesheet_file_name(&self) -> String {
        format!("{}.css", self.css_file_name)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && Path::new(name).file_name().is_some_and(|n| n == name)
        && !name.contains(['/', '\\'])
}
