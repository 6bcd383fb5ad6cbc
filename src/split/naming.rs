//! Content-addressed chunk names

use super::{ChunkArtifact, EncodedChunk};
use crate::font_source::FontFormat;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Encoded chunk paired with its derived name, ready to be written
#[derive(Debug, Clone)]
pub struct NamedChunk {
    pub artifact: ChunkArtifact,
    pub bytes: Vec<u8>,
}

/// Name an encoded chunk after the hash of its bytes.
pub fn name_chunk(chunk: EncodedChunk, format: FontFormat) -> NamedChunk {
    let hash = content_hash(&chunk.bytes);
    let file_name = format!("{hash}.{}", format.extension());
    NamedChunk {
        artifact: ChunkArtifact {
            index: chunk.index,
            hash,
            file_name,
            format,
            size: chunk.bytes.len(),
            code_points: chunk.code_points,
        },
        bytes: chunk.bytes,
    }
}
