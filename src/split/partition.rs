//! Fixed-length partitioning of the ranked glyph sequence

use super::Chunk;
use crate::font_source::Glyph;

/// Cut `ranked` into consecutive runs of `chunk_len` glyphs.
///
/// Only the last run may be shorter. A zero length is treated as 1.
pub fn partition(ranked: &[&Glyph], chunk_len: usize) -> Vec<Chunk> {
    ranked
        .chunks(chunk_len.max(1))
        .enumerate()
        .map(|(index, run)| Chunk {
            index,
            glyphs: run.iter().map(|glyph| glyph.id).collect(),
        })
        .collect()
}
