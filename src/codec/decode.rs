//! sfnt → `FontModel`

use super::bytes::{i16_at, u16_at, u32_at};
use super::CodecError;
use crate::font_source::{FontMetadata, FontModel, Glyph, GlyphOutline, SfntTables};
use std::collections::BTreeSet;
use ttf_parser::{name_id, Face, Tag};

const HINTING_TABLES: [&[u8; 4]; 4] = [b"cvt ", b"fpgm", b"prep", b"gasp"];

pub(crate) fn decode_sfnt(data: &[u8]) -> Result<FontModel, CodecError> {
    let face = Face::parse(data, 0).map_err(|e| CodecError::Parse(e.to_string()))?;
    let raw = face.raw_face();
    let table = |tag: &[u8; 4]| raw.table(Tag::from_bytes(tag));

    if table(b"CFF ").is_some() || table(b"CFF2").is_some() {
        return Err(CodecError::Unsupported(
            "CFF outlines are not supported, only TrueType glyf fonts".to_string(),
        ));
    }

    let head = table(b"head").ok_or(CodecError::MissingTable("head"))?;
    let hhea = table(b"hhea").ok_or(CodecError::MissingTable("hhea"))?;
    let maxp = table(b"maxp").ok_or(CodecError::MissingTable("maxp"))?;
    let glyf = table(b"glyf").ok_or(CodecError::MissingTable("glyf"))?;
    let loca = table(b"loca").ok_or(CodecError::MissingTable("loca"))?;
    let hmtx = table(b"hmtx").ok_or(CodecError::MissingTable("hmtx"))?;

    let num_glyphs = face.number_of_glyphs() as usize;
    let loca_format = i16_at(head, 50).ok_or(CodecError::Truncated { table: "head" })?;
    let offsets = parse_loca(loca, loca_format, num_glyphs)?;
    let num_h_metrics = u16_at(hhea, 34).ok_or(CodecError::Truncated { table: "hhea" })? as usize;
    if num_h_metrics == 0 {
        return Err(CodecError::Truncated { table: "hhea" });
    }

    let mut code_points = collect_code_points(&face, num_glyphs);
    let mut glyphs = Vec::with_capacity(num_glyphs);
    for gid in 0..num_glyphs {
        let (start, end) = (offsets[gid] as usize, offsets[gid + 1] as usize);
        let data = glyf
            .get(start..end)
            .ok_or(CodecError::Truncated { table: "glyf" })?;
        let (advance_width, left_side_bearing) = read_metrics(hmtx, num_h_metrics, gid)?;
        glyphs.push(Glyph {
            id: gid as u16,
            code_points: std::mem::take(&mut code_points[gid]).into_iter().collect(),
            outline: GlyphOutline {
                data: data.to_vec(),
                advance_width,
                left_side_bearing,
            },
        });
    }

    let tables = SfntTables {
        head: head.to_vec(),
        hhea: hhea.to_vec(),
        maxp: maxp.to_vec(),
        os2: table(b"OS/2").map(<[u8]>::to_vec),
        name: table(b"name").map(<[u8]>::to_vec),
        post: table(b"post").map(<[u8]>::to_vec),
        hinting: HINTING_TABLES
            .into_iter()
            .filter_map(|tag| table(tag).map(|data| (*tag, data.to_vec())))
            .collect(),
    };

    Ok(FontModel {
        metadata: read_metadata(&face),
        glyphs,
        tables,
    })
}

fn parse_loca(loca: &[u8], format: i16, num_glyphs: usize) -> Result<Vec<u32>, CodecError> {
    let truncated = CodecError::Truncated { table: "loca" };
    let offsets: Option<Vec<u32>> = match format {
        0 => (0..=num_glyphs)
            .map(|i| u16_at(loca, i * 2).map(|v| u32::from(v) * 2))
            .collect(),
        1 => (0..=num_glyphs).map(|i| u32_at(loca, i * 4)).collect(),
        _ => return Err(CodecError::Truncated { table: "head" }),
    };
    let offsets = offsets.ok_or(truncated)?;
    if offsets.windows(2).any(|w| w[0] > w[1]) {
        return Err(CodecError::Truncated { table: "loca" });
    }
    Ok(offsets)
}

fn read_metrics(hmtx: &[u8], num_h_metrics: usize, gid: usize) -> Result<(u16, i16), CodecError> {
    let truncated = || CodecError::Truncated { table: "hmtx" };
    if gid < num_h_metrics {
        let advance = u16_at(hmtx, gid * 4).ok_or_else(truncated)?;
        let lsb = i16_at(hmtx, gid * 4 + 2).ok_or_else(truncated)?;
        Ok((advance, lsb))
    } else {
        // Trailing glyphs share the last advance and store only a bearing
        let advance = u16_at(hmtx, (num_h_metrics - 1) * 4).ok_or_else(truncated)?;
        let lsb = i16_at(hmtx, num_h_metrics * 4 + (gid - num_h_metrics) * 2)
            .ok_or_else(truncated)?;
        Ok((advance, lsb))
    }
}

/// Invert the Unicode `cmap` subtables into per-glyph code point sets.
fn collect_code_points(face: &Face, num_glyphs: usize) -> Vec<BTreeSet<u32>> {
    let mut per_glyph = vec![BTreeSet::new(); num_glyphs];
    let Some(cmap) = face.tables().cmap else {
        return per_glyph;
    };
    for subtable in cmap.subtables {
        if !subtable.is_unicode() {
            continue;
        }
        subtable.codepoints(|code_point| {
            if let Some(gid) = subtable.glyph_index(code_point) {
                let gid = gid.0 as usize;
                // Mappings onto the void glyph mean "missing"
                if gid != 0 && gid < num_glyphs {
                    per_glyph[gid].insert(code_point);
                }
            }
        });
    }
    per_glyph
}

fn read_metadata(face: &Face) -> FontMetadata {
    let mut metadata = FontMetadata {
        weight_class: face.weight().to_number(),
        italic: face.is_italic(),
        ..Default::default()
    };

    for name in face.names() {
        let slot = match name.name_id {
            name_id::COPYRIGHT_NOTICE => &mut metadata.copyright,
            name_id::FAMILY => &mut metadata.font_family,
            name_id::SUBFAMILY => &mut metadata.font_sub_family,
            name_id::UNIQUE_ID => &mut metadata.unique_sub_family,
            name_id::FULL_NAME => &mut metadata.full_name,
            name_id::VERSION => &mut metadata.version,
            name_id::POST_SCRIPT_NAME => &mut metadata.post_script_name,
            name_id::TYPOGRAPHIC_FAMILY => &mut metadata.preferred_family,
            name_id::TYPOGRAPHIC_SUBFAMILY => &mut metadata.preferred_sub_family,
            _ => continue,
        };
        if slot.is_none() {
            *slot = name.to_string();
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_loca_doubles_offsets() {
        let loca = [0u8, 0, 0, 5, 0, 5];
        assert_eq!(parse_loca(&loca, 0, 2).unwrap(), vec![0, 10, 10]);
    }

    #[test]
    fn test_parse_loca_rejects_short_table() {
        let loca = [0u8, 0, 0, 5];
        assert!(matches!(
            parse_loca(&loca, 0, 2),
            Err(CodecError::Truncated { table: "loca" })
        ));
    }

    #[test]
    fn test_parse_loca_rejects_decreasing_offsets() {
        let loca = [0u8, 0, 0, 0, 0, 0, 0, 8];
        assert_eq!(parse_loca(&loca, 1, 1).unwrap(), vec![0, 8]);
        let loca = [0u8, 0, 0, 8, 0, 0, 0, 4, 0, 0, 0, 0];
        assert!(parse_loca(&loca, 1, 2).is_err());
    }

    #[test]
    fn test_read_metrics_uses_last_advance_for_trailing_glyphs() {
        // two full metrics, then one bearing-only entry
        let hmtx = [0x01, 0xF4, 0, 10, 0x02, 0x58, 0, 20, 0xFF, 0xFB];
        assert_eq!(read_metrics(&hmtx, 2, 0).unwrap(), (500, 10));
        assert_eq!(read_metrics(&hmtx, 2, 1).unwrap(), (600, 20));
        assert_eq!(read_metrics(&hmtx, 2, 2).unwrap(), (600, -5));
        assert!(read_metrics(&hmtx, 2, 3).is_err());
    }
}
