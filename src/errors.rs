//! Typed errors for the splitting pipeline
//!
//! Every failure reaches the caller as a [`StageError`] naming the stage that
//! produced it. Nothing is retried.

use crate::codec::CodecError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Why a pipeline stage failed
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed or unrecognized source font
    #[error("could not decode font: {0}")]
    Decode(#[source] CodecError),

    #[error("could not estimate chunk size: {0}")]
    Estimation(#[from] EstimationError),

    /// The codec rejected a chunk's glyph subset
    #[error("could not encode chunk {chunk}: {source}")]
    Encode {
        chunk: usize,
        #[source]
        source: CodecError,
    },

    #[error("could not write {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Why the sample-based calibration could not produce a chunk length
#[derive(Debug, Error)]
pub enum EstimationError {
    #[error("the font has no glyphs besides the void glyph")]
    NoGlyphs,

    #[error("the chunk byte budget must be positive")]
    ZeroBudget,

    #[error("the calibration sample encoded to zero bytes")]
    EmptySample,

    #[error("the calibration sample could not be encoded: {0}")]
    SampleEncode(#[source] CodecError),
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    LoadFont,
    RankGlyphs,
    EstimateChunkSize,
    PartitionGlyphs,
    SerializeChunks,
    PersistChunks,
    WriteStylesheet,
    WritePreview,
    WriteReport,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::LoadFont => "load font",
            Stage::RankGlyphs => "rank glyphs",
            Stage::EstimateChunkSize => "estimate chunk size",
            Stage::PartitionGlyphs => "partition glyphs",
            Stage::SerializeChunks => "serialize chunks",
            Stage::PersistChunks => "persist chunks",
            Stage::WriteStylesheet => "write stylesheet",
            Stage::WritePreview => "write preview page",
            Stage::WriteReport => "write report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A failure tagged with the stage it came from
#[derive(Debug, Error)]
#[error("stage '{stage}' failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: SplitError,
}

impl StageError {
    pub fn new(stage: Stage, source: impl Into<SplitError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_stage_error_names_the_stage() {
        let err = StageError::new(Stage::EstimateChunkSize, EstimationError::EmptySample);
        assert_eq!(
            err.to_string(),
            "stage 'estimate chunk size' failed: could not estimate chunk size: \
             the calibration sample encoded to zero bytes"
        );
    }

    #[test]
    fn test_encode_error_keeps_codec_error_as_source() {
        let err = SplitError::Encode {
            chunk: 3,
            source: CodecError::UnknownGlyph(7),
        };
        let source = err.source().and_then(|s| s.downcast_ref::<CodecError>());
        assert!(matches!(source, Some(CodecError::UnknownGlyph(7))));
    }
}
