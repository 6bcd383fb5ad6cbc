//! Parallel chunk encoding
//!
//! Chunks share no mutable state, so each one is encoded on the rayon pool.
//! Results are collected back in chunk index order.

use super::{Chunk, EncodedChunk, VOID_GLYPH};
use crate::codec::FontCodec;
use crate::errors::SplitError;
use crate::font_source::{FontFormat, FontModel, GlyphId};
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::debug;

/// Encode every chunk as `[void, glyphs...]` in `format`.
///
/// Takes the model by value and releases it once all chunks are encoded.
/// The first failing chunk fails the whole call.
pub fn serialize_chunks(
    codec: &dyn FontCodec,
    model: FontModel,
    chunks: &[Chunk],
    format: FontFormat,
) -> Result<Vec<EncodedChunk>, SplitError> {
    let encoded = chunks
        .par_iter()
        .map(|chunk| encode_chunk(codec, &model, chunk, format))
        .collect::<Result<Vec<_>, _>>();
    drop(model);
    encoded
}

fn encode_chunk(
    codec: &dyn FontCodec,
    model: &FontModel,
    chunk: &Chunk,
    format: FontFormat,
) -> Result<EncodedChunk, SplitError> {
    let mut subset: Vec<GlyphId> = Vec::with_capacity(chunk.glyphs.len() + 1);
    subset.push(VOID_GLYPH);
    subset.extend_from_slice(&chunk.glyphs);

    let bytes = codec
        .encode(model, &subset, format)
        .map_err(|source| SplitError::Encode {
            chunk: chunk.index,
            source,
        })?;

    let code_points: BTreeSet<u32> = chunk
        .glyphs
        .iter()
        .filter_map(|&id| model.glyph(id))
        .flat_map(|glyph| glyph.code_points.iter().copied())
        .collect();

    debug!(
        "Chunk {}: {} glyphs, {} code points, {} bytes",
        chunk.index,
        chunk.glyphs.len(),
        code_points.len(),
        bytes.len()
    );

    Ok(EncodedChunk {
        index: chunk.index,
        bytes,
        code_points: code_points.into_iter().collect(),
    })
}
