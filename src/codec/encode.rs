//! Glyph subset → sfnt
//!
//! The requested glyphs keep their order and receive new contiguous ids.
//! Components referenced by composite glyphs are appended after them without
//! a `cmap` entry, so every output font is self-contained.

use super::bytes::{pad4, u16_at, write_sfnt, write_u16, write_u32};
use super::cmap::build_cmap;
use super::CodecError;
use crate::font_source::{FontModel, GlyphId, SfntTables};
use std::collections::HashMap;

const TRUETYPE_FLAVOR: u32 = 0x0001_0000;

// Composite component record flags
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

pub(crate) fn encode_sfnt(model: &FontModel, subset: &[GlyphId]) -> Result<Vec<u8>, CodecError> {
    if subset.first() != Some(&0) {
        return Err(CodecError::MissingVoidGlyph);
    }
    for &id in subset {
        model.glyph(id).ok_or(CodecError::UnknownGlyph(id))?;
    }

    let order = with_components(model, subset)?;
    if order.len() > usize::from(u16::MAX) {
        return Err(CodecError::TooManyGlyphs(order.len()));
    }
    let remap: HashMap<GlyphId, u16> = order
        .iter()
        .enumerate()
        .map(|(new_id, &old_id)| (old_id, new_id as u16))
        .collect();

    let (glyf, loca_offsets) = build_glyf(model, &order, &remap);
    let long_loca = glyf.len() > 0x1FFFE;
    let loca = build_loca(&loca_offsets, long_loca);

    let mut hmtx = Vec::with_capacity(order.len() * 4);
    for &id in &order {
        let outline = &model.glyphs[id as usize].outline;
        hmtx.extend_from_slice(&outline.advance_width.to_be_bytes());
        hmtx.extend_from_slice(&outline.left_side_bearing.to_be_bytes());
    }

    let mut mappings = Vec::new();
    for &id in subset.iter().skip(1) {
        let new_id = remap[&id];
        for &code_point in &model.glyphs[id as usize].code_points {
            mappings.push((code_point, new_id));
        }
    }

    let source = &model.tables;
    let num_glyphs = order.len() as u16;
    let mut tables = vec![
        (*b"cmap", build_cmap(&mappings)),
        (*b"glyf", glyf),
        (*b"head", patch_head(source, long_loca)?),
        (*b"hhea", patch_hhea(source, num_glyphs)?),
        (*b"hmtx", hmtx),
        (*b"loca", loca),
        (*b"maxp", patch_maxp(source, num_glyphs)?),
        (*b"post", build_post(source.post.as_deref())),
    ];
    if let Some(os2) = &source.os2 {
        tables.push((*b"OS/2", patch_os2(os2, &mappings)));
    }
    if let Some(name) = &source.name {
        tables.push((*b"name", name.clone()));
    }
    for (tag, data) in &source.hinting {
        tables.push((*tag, data.clone()));
    }

    Ok(write_sfnt(TRUETYPE_FLAVOR, tables))
}

/// Subset order followed by the transitive closure of composite components.
fn with_components(model: &FontModel, subset: &[GlyphId]) -> Result<Vec<GlyphId>, CodecError> {
    let mut seen = vec![false; model.glyph_count()];
    let mut order = Vec::with_capacity(subset.len());
    for &id in subset {
        if !std::mem::replace(&mut seen[id as usize], true) {
            order.push(id);
        }
    }

    let mut cursor = 0;
    while cursor < order.len() {
        let outline = &model.glyphs[order[cursor] as usize].outline;
        if outline.is_composite() {
            for (_, component) in component_records(&outline.data) {
                let slot = seen
                    .get_mut(component as usize)
                    .ok_or(CodecError::UnknownGlyph(component))?;
                if !std::mem::replace(slot, true) {
                    order.push(component);
                }
            }
        }
        cursor += 1;
    }
    Ok(order)
}

/// `(offset of the glyph index field, referenced glyph)` per component.
fn component_records(data: &[u8]) -> Vec<(usize, GlyphId)> {
    let mut records = Vec::new();
    let mut pos = 10; // numberOfContours + bbox
    while let (Some(flags), Some(glyph)) = (u16_at(data, pos), u16_at(data, pos + 2)) {
        records.push((pos + 2, glyph));
        pos += 4;
        pos += if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        if flags & WE_HAVE_A_SCALE != 0 {
            pos += 2;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            pos += 4;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            pos += 8;
        }
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    records
}

fn build_glyf(
    model: &FontModel,
    order: &[GlyphId],
    remap: &HashMap<GlyphId, u16>,
) -> (Vec<u8>, Vec<u32>) {
    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity(order.len() + 1);
    for &id in order {
        offsets.push(glyf.len() as u32);
        let outline = &model.glyphs[id as usize].outline;
        let mut data = outline.data.clone();
        if outline.is_composite() {
            for (field, component) in component_records(&outline.data) {
                write_u16(&mut data, field, remap[&component]);
            }
        }
        glyf.extend_from_slice(&data);
        pad4(&mut glyf);
    }
    offsets.push(glyf.len() as u32);
    (glyf, offsets)
}

fn build_loca(offsets: &[u32], long: bool) -> Vec<u8> {
    let mut loca = Vec::with_capacity(offsets.len() * if long { 4 } else { 2 });
    for &offset in offsets {
        if long {
            loca.extend_from_slice(&offset.to_be_bytes());
        } else {
            loca.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
        }
    }
    loca
}

fn patch_head(source: &SfntTables, long_loca: bool) -> Result<Vec<u8>, CodecError> {
    if source.head.len() < 54 {
        return Err(CodecError::Truncated { table: "head" });
    }
    let mut head = source.head.clone();
    write_u32(&mut head, 8, 0); // checkSumAdjustment, fixed up by the writer
    write_u16(&mut head, 50, u16::from(long_loca));
    Ok(head)
}

fn patch_hhea(source: &SfntTables, num_glyphs: u16) -> Result<Vec<u8>, CodecError> {
    if source.hhea.len() < 36 {
        return Err(CodecError::Truncated { table: "hhea" });
    }
    let mut hhea = source.hhea.clone();
    // every glyph gets a full metric record
    write_u16(&mut hhea, 34, num_glyphs);
    Ok(hhea)
}

fn patch_maxp(source: &SfntTables, num_glyphs: u16) -> Result<Vec<u8>, CodecError> {
    if source.maxp.len() < 6 {
        return Err(CodecError::Truncated { table: "maxp" });
    }
    let mut maxp = source.maxp.clone();
    write_u16(&mut maxp, 4, num_glyphs);
    Ok(maxp)
}

/// Version 3 `post`: keeps the source metrics, drops glyph names.
fn build_post(source: Option<&[u8]>) -> Vec<u8> {
    let mut post = vec![0u8; 32];
    if let Some(header) = source.and_then(|data| data.get(..32)) {
        post.copy_from_slice(header);
    }
    write_u32(&mut post, 0, 0x0003_0000);
    post
}

fn patch_os2(source: &[u8], mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut os2 = source.to_vec();
    if os2.len() >= 68 {
        let clamp = |cp: u32| cp.min(0xFFFF) as u16;
        let first = mappings.iter().map(|&(cp, _)| cp).min().unwrap_or(0);
        let last = mappings.iter().map(|&(cp, _)| cp).max().unwrap_or(0);
        write_u16(&mut os2, 64, clamp(first));
        write_u16(&mut os2, 66, clamp(last));
    }
    os2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_source::{FontMetadata, Glyph, GlyphOutline};

    fn composite(components: &[GlyphId]) -> Vec<u8> {
        let mut data = vec![0xFF, 0xFF, 0, 0, 0, 0, 0, 0, 0, 0];
        for (i, &component) in components.iter().enumerate() {
            let mut flags = ARG_1_AND_2_ARE_WORDS;
            if i + 1 < components.len() {
                flags |= MORE_COMPONENTS;
            }
            data.extend_from_slice(&flags.to_be_bytes());
            data.extend_from_slice(&component.to_be_bytes());
            data.extend_from_slice(&[0, 0, 0, 0]);
        }
        data
    }

    fn model_with(outlines: Vec<Vec<u8>>) -> FontModel {
        let glyphs = outlines
            .into_iter()
            .enumerate()
            .map(|(id, data)| Glyph {
                id: id as GlyphId,
                code_points: Vec::new(),
                outline: GlyphOutline {
                    data,
                    ..Default::default()
                },
            })
            .collect();
        FontModel::new(FontMetadata::default(), glyphs)
    }

    #[test]
    fn test_component_records_walk_all_components() {
        let data = composite(&[3, 7]);
        assert_eq!(component_records(&data), vec![(12, 3), (20, 7)]);
    }

    #[test]
    fn test_components_are_appended_once() {
        let model = model_with(vec![
            vec![],
            vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
            composite(&[1, 3]),
            composite(&[1]),
        ]);
        let order = with_components(&model, &[0, 2]).unwrap();
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_missing_component_is_an_error() {
        let model = model_with(vec![vec![], composite(&[42])]);
        assert!(matches!(
            with_components(&model, &[0, 1]),
            Err(CodecError::UnknownGlyph(42))
        ));
    }

    #[test]
    fn test_build_glyf_remaps_component_ids() {
        let model = model_with(vec![vec![], vec![0, 1, 0, 0, 0, 0, 0, 0, 0, 0], composite(&[1])]);
        let order = vec![0, 2, 1];
        let remap: HashMap<GlyphId, u16> =
            order.iter().enumerate().map(|(n, &o)| (o, n as u16)).collect();
        let (glyf, offsets) = build_glyf(&model, &order, &remap);

        assert_eq!(offsets, vec![0, 0, 20, 32]);
        // component of glyph 2 now points at new id 2
        assert_eq!(u16_at(&glyf, 12), Some(2));
    }

    #[test]
    fn test_short_loca_halves_offsets() {
        assert_eq!(build_loca(&[0, 8, 20], false), vec![0, 0, 0, 4, 0, 10]);
        assert_eq!(build_loca(&[0, 8], true), vec![0, 0, 0, 0, 0, 0, 0, 8]);
    }

    #[test]
    fn test_post_is_version_three() {
        let post = build_post(None);
        assert_eq!(&post[..4], &[0, 3, 0, 0]);
        assert_eq!(post.len(), 32);
    }
}
