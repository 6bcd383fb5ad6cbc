//! Chunk splitting
//!
//! The stages here turn a decoded font into size-bounded chunks:
//! - `ranker` orders glyphs by priority
//! - `estimator` calibrates how many glyphs fit in one chunk
//! - `partition` cuts the ranked sequence into fixed-length runs
//! - `serializer` encodes each run through the codec
//! - `naming` derives content-addressed file names
//! - `stylesheet` maps each chunk to a `unicode-range` rule

pub mod estimator;
pub mod naming;
pub mod partition;
pub mod ranker;
pub mod serializer;
pub mod stylesheet;

pub use estimator::{estimate_chunk_len, ChunkEstimate};
pub use naming::{content_hash, name_chunk, NamedChunk};
pub use partition::partition;
pub use ranker::rank_glyphs;
pub use serializer::serialize_chunks;
pub use stylesheet::{generate_stylesheet, FontFaceOptions};

use crate::font_source::{FontFormat, GlyphId};
use serde::Serialize;

/// Id of the placeholder glyph prepended to every encoded subset
pub const VOID_GLYPH: GlyphId = 0;

/// A planned run of glyphs, without the void glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in partition order
    pub index: usize,
    pub glyphs: Vec<GlyphId>,
}

/// Chunk bytes straight out of the codec
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    pub index: usize,
    pub bytes: Vec<u8>,
    /// Code points covered by the chunk's glyphs, ascending
    pub code_points: Vec<u32>,
}

/// A chunk written to storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkArtifact {
    pub index: usize,
    /// Hex SHA-256 of the file contents
    pub hash: String,
    /// `<hash>.<ext>`
    pub file_name: String,
    pub format: FontFormat,
    /// Size in bytes
    pub size: usize,
    pub code_points: Vec<u32>,
}

impl ChunkArtifact {
    /// Covered code points decoded as text
    pub fn characters(&self) -> String {
        self.code_points
            .iter()
            .filter_map(|&cp| char::from_u32(cp))
            .collect()
    }
}
