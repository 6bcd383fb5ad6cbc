//! In-memory glyph table produced by a codec
//!
//! A `FontModel` is owned by one pipeline run. Glyphs are stored in glyph-id
//! order, so `glyphs[i].id == i` and glyph 0 is the void glyph.

use super::FontMetadata;

/// Glyph identifier, the index of the glyph in the source font
pub type GlyphId = u16;

/// Outline and horizontal metrics of one glyph, passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphOutline {
    /// Raw `glyf` record; empty for glyphs without contours
    pub data: Vec<u8>,
    pub advance_width: u16,
    pub left_side_bearing: i16,
}

impl GlyphOutline {
    /// Composite glyphs carry a negative contour count.
    pub fn is_composite(&self) -> bool {
        self.data.len() >= 2 && i16::from_be_bytes([self.data[0], self.data[1]]) < 0
    }
}

/// One glyph record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    pub id: GlyphId,
    /// Code points mapped to this glyph, ascending
    pub code_points: Vec<u32>,
    pub outline: GlyphOutline,
}

impl Glyph {
    pub fn first_code_point(&self) -> Option<u32> {
        self.code_points.first().copied()
    }
}

/// Font-wide sfnt tables kept from the source for re-encoding.
#[derive(Debug, Clone, Default)]
pub struct SfntTables {
    pub head: Vec<u8>,
    pub hhea: Vec<u8>,
    pub maxp: Vec<u8>,
    pub os2: Option<Vec<u8>>,
    pub name: Option<Vec<u8>>,
    pub post: Option<Vec<u8>>,
    /// `cvt `, `fpgm`, `prep` and `gasp`, copied as-is
    pub hinting: Vec<([u8; 4], Vec<u8>)>,
}

/// Decoded font: metadata plus the ordered glyph table
#[derive(Debug, Clone, Default)]
pub struct FontModel {
    pub metadata: FontMetadata,
    pub glyphs: Vec<Glyph>,
    pub tables: SfntTables,
}

impl FontModel {
    pub fn new(metadata: FontMetadata, glyphs: Vec<Glyph>) -> Self {
        Self {
            metadata,
            glyphs,
            tables: SfntTables::default(),
        }
    }

    pub fn glyph(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id as usize)
    }

    /// The mandatory placeholder every subset starts with
    pub fn void_glyph(&self) -> Option<&Glyph> {
        self.glyphs.first()
    }

    /// Every glyph except the void glyph, in source order.
    pub fn addressable_glyphs(&self) -> &[Glyph] {
        self.glyphs.get(1..).unwrap_or(&[])
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
