//! Character-to-glyph table construction
//!
//! Segments are only merged when both the code points and the glyph ids are
//! consecutive, so every segment is expressible with `idDelta` alone.

use super::bytes::search_params;

/// A run of consecutive code points mapped to consecutive glyph ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    start: u32,
    end: u32,
    start_glyph: u16,
}

fn segments(mappings: &[(u32, u16)]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for &(code_point, glyph) in mappings {
        if let Some(last) = segments.last_mut() {
            let run = last.end - last.start + 1;
            if code_point == last.end + 1 && u32::from(glyph) == u32::from(last.start_glyph) + run {
                last.end = code_point;
                continue;
            }
        }
        segments.push(Segment {
            start: code_point,
            end: code_point,
            start_glyph: glyph,
        });
    }
    segments
}

/// Format 4 subtable for the BMP. Returns `None` when the segment count
/// overflows the 16-bit length field.
fn format4(mappings: &[(u32, u16)]) -> Option<Vec<u8>> {
    // 0xFFFF is reserved for the terminating segment
    let bmp: Vec<(u32, u16)> = mappings
        .iter()
        .copied()
        .filter(|&(cp, _)| cp < 0xFFFF)
        .collect();
    let mut segments = segments(&bmp);
    segments.push(Segment {
        start: 0xFFFF,
        end: 0xFFFF,
        start_glyph: 0,
    });

    let seg_count = u16::try_from(segments.len()).ok()?;
    let length = u16::try_from(16 + segments.len() * 8).ok()?;
    let (entry_selector, search_range) = search_params(seg_count, 2);
    let seg_count_x2 = seg_count.checked_mul(2)?;
    let range_shift = seg_count_x2 - search_range;

    let mut table = Vec::with_capacity(length as usize);
    table.extend_from_slice(&4u16.to_be_bytes());
    table.extend_from_slice(&length.to_be_bytes());
    table.extend_from_slice(&0u16.to_be_bytes()); // language
    table.extend_from_slice(&seg_count_x2.to_be_bytes());
    table.extend_from_slice(&search_range.to_be_bytes());
    table.extend_from_slice(&entry_selector.to_be_bytes());
    table.extend_from_slice(&range_shift.to_be_bytes());
    for seg in &segments {
        table.extend_from_slice(&(seg.end as u16).to_be_bytes());
    }
    table.extend_from_slice(&0u16.to_be_bytes()); // reservedPad
    for seg in &segments {
        table.extend_from_slice(&(seg.start as u16).to_be_bytes());
    }
    for seg in &segments {
        // The sentinel maps 0xFFFF to glyph 0 through a delta of 1
        let delta = if seg.start == 0xFFFF {
            1u16
        } else {
            seg.start_glyph.wrapping_sub(seg.start as u16)
        };
        table.extend_from_slice(&delta.to_be_bytes());
    }
    for _ in &segments {
        table.extend_from_slice(&0u16.to_be_bytes()); // idRangeOffset
    }
    Some(table)
}

/// Format 12 subtable covering the full Unicode range
fn format12(mappings: &[(u32, u16)]) -> Vec<u8> {
    let groups = segments(mappings);
    let length = 16 + groups.len() * 12;

    let mut table = Vec::with_capacity(length);
    table.extend_from_slice(&12u16.to_be_bytes());
    table.extend_from_slice(&0u16.to_be_bytes()); // reserved
    table.extend_from_slice(&(length as u32).to_be_bytes());
    table.extend_from_slice(&0u32.to_be_bytes()); // language
    table.extend_from_slice(&(groups.len() as u32).to_be_bytes());
    for group in &groups {
        table.extend_from_slice(&group.start.to_be_bytes());
        table.extend_from_slice(&group.end.to_be_bytes());
        table.extend_from_slice(&u32::from(group.start_glyph).to_be_bytes());
    }
    table
}

/// Build a `cmap` table from `(code point, glyph id)` pairs.
///
/// Pairs are sorted and the first mapping of a repeated code point wins.
/// A Windows BMP subtable is always written; a Windows full-repertoire
/// subtable is added when supplementary-plane code points are present or
/// the BMP subtable would overflow.
pub(crate) fn build_cmap(mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut sorted = mappings.to_vec();
    sorted.sort_by_key(|&(cp, _)| cp);
    sorted.dedup_by_key(|&mut (cp, _)| cp);

    let mut subtables: Vec<(u16, Vec<u8>)> = Vec::new();
    let bmp = format4(&sorted);
    let needs_full = bmp.is_none() || sorted.iter().any(|&(cp, _)| cp > 0xFFFF);
    if let Some(bmp) = bmp {
        subtables.push((1, bmp));
    }
    if needs_full {
        subtables.push((10, format12(&sorted)));
    }

    let mut cmap = Vec::new();
    cmap.extend_from_slice(&0u16.to_be_bytes()); // version
    cmap.extend_from_slice(&(subtables.len() as u16).to_be_bytes());
    let mut offset = 4 + subtables.len() * 8;
    for (encoding, data) in &subtables {
        cmap.extend_from_slice(&3u16.to_be_bytes()); // Windows
        cmap.extend_from_slice(&encoding.to_be_bytes());
        cmap.extend_from_slice(&(offset as u32).to_be_bytes());
        offset += data.len();
    }
    for (_, data) in subtables {
        cmap.extend_from_slice(&data);
    }
    cmap
}
