//! Font container formats understood by the bundled codec

use serde::{Deserialize, Serialize};
use std::fmt;

/// Container format of a font binary.
///
/// The tag doubles as the file extension of written chunks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    /// Plain sfnt with TrueType outlines
    #[default]
    Ttf,
    /// WOFF 1.0 (zlib-compressed sfnt tables)
    Woff,
}

impl FontFormat {
    /// File extension used for chunk files in this format
    pub fn extension(&self) -> &'static str {
        match self {
            FontFormat::Ttf => "ttf",
            FontFormat::Woff => "woff",
        }
    }

    /// Value of the `format()` hint in a CSS `src` descriptor
    pub fn css_format(&self) -> &'static str {
        match self {
            FontFormat::Ttf => "truetype",
            FontFormat::Woff => "woff",
        }
    }

    /// Sniff the format from the leading magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.get(..4)? {
            b"wOFF" => Some(FontFormat::Woff),
            [0x00, 0x01, 0x00, 0x00] | b"true" => Some(FontFormat::Ttf),
            _ => None,
        }
    }

    /// Parse a format name, accepting the extension or the CSS hint.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ttf" | "truetype" => Some(FontFormat::Ttf),
            "woff" => Some(FontFormat::Woff),
            _ => None,
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
