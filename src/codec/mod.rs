//! Font binary codec
//!
//! The splitting pipeline only talks to a [`FontCodec`]: bytes in, glyph
//! table out, and a glyph subset back to bytes. [`SfntCodec`] is the bundled
//! implementation for TrueType-outline fonts in plain sfnt or WOFF 1.0
//! containers.

mod bytes;
mod cmap;
mod decode;
mod encode;
mod woff;

use crate::font_source::{FontFormat, FontModel, GlyphId};
use std::borrow::Cow;
use thiserror::Error;

/// Errors raised while reading or writing font binaries.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The sfnt structure could not be parsed.
    #[error("font data could not be parsed: {0}")]
    Parse(String),

    #[error("required table '{0}' is missing")]
    MissingTable(&'static str),

    #[error("table '{table}' is truncated or inconsistent")]
    Truncated { table: &'static str },

    /// The font is valid but uses features this codec does not handle.
    #[error("unsupported font: {0}")]
    Unsupported(String),

    #[error("glyph {0} does not exist in the font")]
    UnknownGlyph(GlyphId),

    #[error("glyph subset must start with the void glyph")]
    MissingVoidGlyph,

    #[error("subset needs {0} glyphs, more than a font can address")]
    TooManyGlyphs(usize),

    #[error("invalid WOFF container: {0}")]
    Woff(String),

    #[error("table compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// Capability interface over a font binary format.
///
/// Implementations must be deterministic: encoding the same subset of the
/// same model twice yields identical bytes.
pub trait FontCodec: Send + Sync {
    /// Parse a font binary into a glyph table.
    fn decode(&self, bytes: &[u8], format: FontFormat) -> Result<FontModel, CodecError>;

    /// Serialize `subset` (glyph ids, void glyph first) as a standalone font.
    fn encode(
        &self,
        model: &FontModel,
        subset: &[GlyphId],
        format: FontFormat,
    ) -> Result<Vec<u8>, CodecError>;
}

/// TrueType (`glyf`) codec for sfnt and WOFF 1.0 containers
#[derive(Debug, Clone, Copy, Default)]
pub struct SfntCodec;

impl FontCodec for SfntCodec {
    fn decode(&self, bytes: &[u8], format: FontFormat) -> Result<FontModel, CodecError> {
        let sfnt = match format {
            FontFormat::Ttf => Cow::Borrowed(bytes),
            FontFormat::Woff => Cow::Owned(woff::unwrap(bytes)?),
        };
        decode::decode_sfnt(&sfnt)
    }

    fn encode(
        &self,
        model: &FontModel,
        subset: &[GlyphId],
        format: FontFormat,
    ) -> Result<Vec<u8>, CodecError> {
        let sfnt = encode::encode_sfnt(model, subset)?;
        match format {
            FontFormat::Ttf => Ok(sfnt),
            FontFormat::Woff => woff::wrap(&sfnt),
        }
    }
}
