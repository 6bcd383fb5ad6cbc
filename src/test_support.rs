//! Fixtures shared by unit tests: synthetic fonts and a fake codec

use crate::codec::{CodecError, FontCodec, SfntCodec};
use crate::font_source::{
    FontFormat, FontMetadata, FontModel, Glyph, GlyphId, GlyphOutline, SfntTables,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Description of one glyph in a synthetic font
pub struct SampleGlyph {
    pub code_points: Vec<u32>,
    pub outline_len: usize,
}

impl SampleGlyph {
    pub fn simple(code_points: &[u32], outline_len: usize) -> Self {
        Self {
            code_points: code_points.to_vec(),
            outline_len,
        }
    }

    pub fn unmapped(outline_len: usize) -> Self {
        Self::simple(&[], outline_len)
    }
}

fn simple_outline(id: usize, len: usize) -> Vec<u8> {
    // one contour and a zero bounding box, then filler
    let mut data = vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
    data.extend((0..len.saturating_sub(10)).map(|i| (i + id) as u8));
    data
}

fn name_table(records: &[(u16, &str)]) -> Vec<u8> {
    let strings: Vec<Vec<u8>> = records
        .iter()
        .map(|(_, value)| value.encode_utf16().flat_map(u16::to_be_bytes).collect())
        .collect();
    let mut table = Vec::new();
    table.extend_from_slice(&0u16.to_be_bytes());
    table.extend_from_slice(&(records.len() as u16).to_be_bytes());
    table.extend_from_slice(&((6 + records.len() * 12) as u16).to_be_bytes());
    let mut offset = 0u16;
    for ((id, _), string) in records.iter().zip(&strings) {
        for field in [3u16, 1, 0x0409, *id, string.len() as u16, offset] {
            table.extend_from_slice(&field.to_be_bytes());
        }
        offset += string.len() as u16;
    }
    for string in strings {
        table.extend_from_slice(&string);
    }
    table
}

fn sample_tables() -> SfntTables {
    let mut head = vec![0u8; 54];
    head[..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    head[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes());
    head[18..20].copy_from_slice(&1000u16.to_be_bytes());

    let mut hhea = vec![0u8; 36];
    hhea[..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    hhea[4..6].copy_from_slice(&800i16.to_be_bytes());
    hhea[6..8].copy_from_slice(&(-200i16).to_be_bytes());

    let mut maxp = vec![0u8; 32];
    maxp[..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());

    let mut os2 = vec![0u8; 96];
    os2[..2].copy_from_slice(&4u16.to_be_bytes());
    os2[4..6].copy_from_slice(&400u16.to_be_bytes());
    os2[6..8].copy_from_slice(&5u16.to_be_bytes());
    os2[62..64].copy_from_slice(&0x0040u16.to_be_bytes());

    SfntTables {
        head,
        hhea,
        maxp,
        os2: Some(os2),
        name: Some(name_table(&[
            (1, "Sample Sans"),
            (2, "Regular"),
            (4, "Sample Sans Regular"),
        ])),
        post: None,
        hinting: Vec::new(),
    }
}

/// In-memory model whose glyph 0 is an empty void glyph.
pub fn sample_model(glyphs: &[SampleGlyph]) -> FontModel {
    let mut all = vec![Glyph {
        id: 0,
        code_points: Vec::new(),
        outline: GlyphOutline {
            data: Vec::new(),
            advance_width: 500,
            left_side_bearing: 0,
        },
    }];
    for (index, sample) in glyphs.iter().enumerate() {
        let id = index + 1;
        all.push(Glyph {
            id: id as GlyphId,
            code_points: sample.code_points.clone(),
            outline: GlyphOutline {
                data: simple_outline(id, sample.outline_len),
                advance_width: 500 + id as u16,
                left_side_bearing: 10,
            },
        });
    }
    FontModel {
        metadata: FontMetadata::default(),
        glyphs: all,
        tables: sample_tables(),
    }
}

/// A complete TrueType binary built from `glyphs` plus a void glyph.
pub fn sample_font_bytes(glyphs: &[SampleGlyph]) -> Vec<u8> {
    let model = sample_model(glyphs);
    let all: Vec<GlyphId> = (0..model.glyph_count() as GlyphId).collect();
    SfntCodec
        .encode(&model, &all, FontFormat::Ttf)
        .expect("sample font encodes")
}

/// `count` glyphs mapped to consecutive code points from `first`.
pub fn sequential_glyphs(first: u32, count: usize, outline_len: usize) -> Vec<SampleGlyph> {
    (0..count)
        .map(|i| SampleGlyph::simple(&[first + i as u32], outline_len))
        .collect()
}

/// Codec with a linear size model: a fixed overhead plus every outline.
///
/// Output bytes embed glyph ids so distinct subsets never collide.
pub struct FakeCodec {
    pub model: FontModel,
    pub overhead: usize,
    pub fail_on: Option<GlyphId>,
    pub encode_calls: AtomicUsize,
}

impl FakeCodec {
    pub fn new(model: FontModel, overhead: usize) -> Self {
        Self {
            model,
            overhead,
            fail_on: None,
            encode_calls: AtomicUsize::new(0),
        }
    }

    /// Model with a void glyph and `count` glyphs of `outline_len` bytes
    /// mapped to consecutive code points from U+4E00.
    pub fn uniform(count: usize, outline_len: usize, overhead: usize) -> Self {
        let glyphs = (0..=count)
            .map(|id| Glyph {
                id: id as GlyphId,
                code_points: if id == 0 { Vec::new() } else { vec![0x4E00 + id as u32 - 1] },
                outline: GlyphOutline {
                    data: if id == 0 {
                        Vec::new()
                    } else {
                        (id as u16).to_be_bytes().repeat(outline_len / 2)
                    },
                    ..Default::default()
                },
            })
            .collect();
        Self::new(FontModel::new(FontMetadata::default(), glyphs), overhead)
    }

    pub fn calls(&self) -> usize {
        self.encode_calls.load(Ordering::SeqCst)
    }
}

impl FontCodec for FakeCodec {
    fn decode(&self, _bytes: &[u8], _format: FontFormat) -> Result<FontModel, CodecError> {
        Ok(self.model.clone())
    }

    fn encode(
        &self,
        model: &FontModel,
        subset: &[GlyphId],
        _format: FontFormat,
    ) -> Result<Vec<u8>, CodecError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        if subset.first() != Some(&0) {
            return Err(CodecError::MissingVoidGlyph);
        }
        let mut bytes = vec![0u8; self.overhead];
        for &id in subset {
            if Some(id) == self.fail_on {
                return Err(CodecError::Unsupported(format!("glyph {id} rejected")));
            }
            let glyph = model.glyph(id).ok_or(CodecError::UnknownGlyph(id))?;
            bytes.extend_from_slice(&glyph.outline.data);
        }
        Ok(bytes)
    }
}
