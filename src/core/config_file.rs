//! User configuration file handling
//!
//! Manages settings from ~/.config/fontsplit/settings.json, or from a file
//! named with `--config`.

use crate::font_source::FontFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Run options read from a settings file
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub source_format: Option<FontFormat>,
    /// Chunk format, `ttf` or `woff`
    pub format: Option<FontFormat>,
    pub family: Option<String>,
    pub weight: Option<String>,
    pub style: Option<String>,
    pub display: Option<String>,
    /// Byte budget per chunk
    pub chunk_size: Option<usize>,
    pub css_file_name: Option<String>,
    pub out_dir: Option<PathBuf>,
    /// Priority list file; relative paths resolve against the settings file
    pub priority: Option<PathBuf>,
    pub preview: Option<bool>,
    pub report: Option<bool>,
}

impl ConfigFile {
    /// Get the path to the fontsplit config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join("fontsplit")
    }

    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load the user settings file if there is one.
    ///
    /// A missing file is normal; an unreadable one is logged and ignored.
    pub fn load() -> Option<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return None;
        }

        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring user settings: {:#}", e);
                None
            }
        }
    }

    /// Load a settings file that the user asked for explicitly.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        if let (Some(priority), Some(base)) = (&config.priority, path.parent()) {
            if priority.is_relative() {
                config.priority = Some(base.join(priority));
            }
        }
        debug!("Loaded settings from {:?}", path);
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Settings written by `--init-config`
    pub fn example() -> Self {
        Self {
            format: Some(FontFormat::Woff),
            style: Some("normal".to_string()),
            display: Some("swap".to_string()),
            chunk_size: Some(super::config::DEFAULT_CHUNK_SIZE),
            css_file_name: Some(super::config::DEFAULT_CSS_FILE_NAME.to_string()),
            preview: Some(true),
            report: Some(true),
            ..Default::default()
        }
    }

    /// Initialize the user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/fontsplit directory structure
    /// 2. A settings.json file with example values
    /// 3. A logs/ directory used by `--log-file`
    pub fn initialize_config_directory() -> Result<()> {
        let config_dir = Self::config_dir();
        fs::create_dir_all(&config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = config_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = Self::config_path();
        if !settings_path.exists() {
            Self::example().save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - View logs written with --log-file in: {:?}", logs_dir);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_leaves_other_fields_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "format": "woff", "chunk_size": 4096 }"#).unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.format, Some(FontFormat::Woff));
        assert_eq!(config.chunk_size, Some(4096));
        assert_eq!(config.family, None);
        assert_eq!(config.preview, None);
    }

    #[test]
    fn test_relative_priority_resolves_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "priority": "order.txt" }"#).unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.priority, Some(dir.path().join("order.txt")));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "format": "otf" }"#).unwrap();
        assert!(ConfigFile::load_from(&path).is_err());
    }

    #[test]
    fn test_example_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        ConfigFile::example().save_to(&path).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::example());
    }
}
