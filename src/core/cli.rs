//! Command line interface for fontsplit
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Every run option can also come from the
//! settings file; flags given here win over it.

use crate::font_source::FontFormat;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// fontsplit CLI arguments
///
/// Examples:
///   fontsplit MyFont.ttf                          # Split with defaults into ./build
///   fontsplit MyFont.ttf -f woff -s 102400        # 100 KiB WOFF chunks
///   fontsplit MyFont.ttf --family "My Font"       # Override the CSS family name
///   fontsplit MyFont.ttf --priority order.txt     # Custom glyph priority
///   fontsplit --init-config                       # Write an example settings file
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "fontsplit",
    version,
    about = "Split a font into size-bounded chunks for lazy web loading",
    long_about = "fontsplit partitions a font's glyphs into chunk files of roughly equal byte size, most frequently used characters first, and writes a stylesheet whose @font-face rules map each chunk to the unicode-range it covers."
)]
pub struct CliArgs {
    /// Font file to split (TrueType or WOFF)
    #[clap(
        value_name = "FONT",
        required_unless_present = "init_config",
        help = "Font file to split",
        long_help = "Path to the source font. TrueType-outline fonts are supported, either as a raw .ttf or wrapped in WOFF 1.0."
    )]
    pub source: Option<PathBuf>,

    #[clap(
        long = "source-format",
        value_enum,
        help = "Container format of the source font",
        long_help = "Container format of the source font. Detected from the file's magic bytes when omitted."
    )]
    pub source_format: Option<FontFormat>,

    #[clap(
        long = "format",
        short = 'f',
        value_enum,
        help = "Format of the written chunks [default: ttf]"
    )]
    pub format: Option<FontFormat>,

    #[clap(
        long = "family",
        help = "CSS font-family name",
        long_help = "Family name used in every @font-face rule. Defaults to the font's typographic or legacy family name."
    )]
    pub family: Option<String>,

    #[clap(
        long = "weight",
        help = "CSS font-weight",
        long_help = "Value of font-weight in every @font-face rule. Defaults to the font's OS/2 weight class."
    )]
    pub weight: Option<String>,

    #[clap(long = "style", help = "CSS font-style [default: normal]")]
    pub style: Option<String>,

    #[clap(
        long = "display",
        help = "CSS font-display [default: swap]",
        long_help = "Value of font-display in every @font-face rule: auto, block, swap, fallback or optional."
    )]
    pub display: Option<String>,

    /// Byte budget per chunk
    #[clap(
        long = "chunk-size",
        short = 's',
        value_name = "BYTES",
        help = "Target size of each chunk in bytes [default: 204800]"
    )]
    pub chunk_size: Option<usize>,

    #[clap(
        long = "css-file-name",
        value_name = "NAME",
        help = "Stylesheet file name without extension [default: result]"
    )]
    pub css_file_name: Option<String>,

    #[clap(
        long = "out-dir",
        short = 'o',
        value_name = "DIR",
        help = "Output directory [default: ./build]"
    )]
    pub out_dir: Option<PathBuf>,

    /// Custom priority order
    #[clap(
        long = "priority",
        short = 'p',
        value_name = "FILE",
        conflicts_with = "no_priority",
        help = "Glyph priority list (text or JSON)",
        long_help = "File listing characters in the order they should be packed. A .json file holds an array, possibly nested, of code point numbers or strings; any other file is read as plain UTF-8 text, character by character."
    )]
    pub priority: Option<PathBuf>,

    #[clap(
        long = "no-priority",
        help = "Keep the font's own glyph order instead of ranking glyphs"
    )]
    pub no_priority: bool,

    #[clap(long = "no-preview", help = "Do not write index.html")]
    pub no_preview: bool,

    #[clap(long = "no-report", help = "Do not write reporter.json")]
    pub no_report: bool,

    #[clap(
        long = "config",
        short = 'c',
        value_name = "FILE",
        help = "Settings file to use instead of the user settings.json"
    )]
    pub config: Option<PathBuf>,

    /// Initialize user configuration directory with an example settings file
    #[clap(
        long = "init-config",
        help = "Write an example settings file to the user config directory",
        long_help = "Create the fontsplit config directory with an example settings.json and a logs/ folder, then exit."
    )]
    pub init_config: bool,

    #[clap(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        conflicts_with = "quiet",
        help = "More output (-v debug, -vv trace)"
    )]
    pub verbose: u8,

    #[clap(short = 'q', long = "quiet", help = "Only print warnings and errors")]
    pub quiet: bool,

    #[clap(
        long = "log-file",
        help = "Also write logs to the user config directory's logs/ folder"
    )]
    pub log_file: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist before any work starts,
    /// providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.source {
            if !path.is_file() {
                return Err(format!(
                    "Font file does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
        }

        if let Some(path) = &self.priority {
            if !path.is_file() {
                return Err(format!(
                    "Priority list does not exist: {}",
                    path.display()
                ));
            }
        }

        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(format!("Settings file does not exist: {}", path.display()));
            }
        }

        if self.chunk_size == Some(0) {
            return Err("Chunk size must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("fontsplit").chain(args.iter().copied()))
    }

    #[test]
    fn test_parses_run_options() {
        let args = parse(&[
            "font.ttf", "-f", "woff", "-s", "1024", "--family", "Demo", "-o", "out", "-vv",
        ])
        .unwrap();
        assert_eq!(args.source, Some(PathBuf::from("font.ttf")));
        assert_eq!(args.format, Some(FontFormat::Woff));
        assert_eq!(args.chunk_size, Some(1024));
        assert_eq!(args.family.as_deref(), Some("Demo"));
        assert_eq!(args.out_dir, Some(PathBuf::from("out")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_source_required_unless_init_config() {
        assert!(parse(&[]).is_err());
        let args = parse(&["--init-config"]).unwrap();
        assert!(args.init_config);
        assert!(args.source.is_none());
    }

    #[test]
    fn test_conflicting_flags_are_rejected() {
        assert!(parse(&["font.ttf", "-v", "-q"]).is_err());
        assert!(parse(&["font.ttf", "--priority", "p.txt", "--no-priority"]).is_err());
    }

    #[test]
    fn test_validate_reports_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("font.ttf");
        std::fs::write(&font, b"\0\x01\0\0").unwrap();

        let mut args = parse(&[font.to_str().unwrap()]).unwrap();
        assert!(args.validate().is_ok());

        args.priority = Some(dir.path().join("missing.txt"));
        let message = args.validate().unwrap_err();
        assert!(message.contains("Priority list does not exist"));

        args.priority = None;
        args.source = Some(dir.path().join("missing.ttf"));
        assert!(args.validate().unwrap_err().contains("Font file does not exist"));
    }

    #[test]
    fn test_zero_chunk_size_is_invalid() {
        let args = CliArgs {
            chunk_size: Some(0),
            ..Default::default()
        };
        assert!(args.validate().is_err());
    }
}
