//! Sample-based chunk length calibration
//!
//! The source file size gives a naive bytes-per-glyph figure. A window of
//! glyphs from the middle of the ranked sequence is then encoded for real,
//! and the observed size corrects the glyph count per chunk for the target
//! format's fixed overhead and for outline size variance.

use super::VOID_GLYPH;
use crate::codec::FontCodec;
use crate::errors::EstimationError;
use crate::font_source::{FontFormat, FontModel, Glyph, GlyphId};
use serde::Serialize;
use tracing::debug;

/// Outcome of one calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChunkEstimate {
    /// Source size divided by glyph count
    pub bytes_per_glyph: f64,
    /// Glyphs in the calibration sample
    pub sample_len: usize,
    /// Encoded size of the sample, void glyph included
    pub sample_bytes: usize,
    /// Glyphs per chunk fed to the partitioner, at least 1
    pub chunk_len: usize,
}

/// `(start, len)` of a window of `trial_len` glyphs centred on the middle
/// of a sequence of `total` glyphs, clamped to the sequence.
pub fn sample_window(total: usize, trial_len: usize) -> (usize, usize) {
    let len = trial_len.min(total);
    let start = (total as f64 / 2.0 - len as f64 / 2.0).floor().max(0.0) as usize;
    (start.min(total - len), len)
}

/// Compute how many glyphs fit in one chunk of `byte_budget` bytes.
pub fn estimate_chunk_len(
    codec: &dyn FontCodec,
    model: &FontModel,
    ranked: &[&Glyph],
    source_size: usize,
    byte_budget: usize,
    format: FontFormat,
) -> Result<ChunkEstimate, EstimationError> {
    if ranked.is_empty() {
        return Err(EstimationError::NoGlyphs);
    }
    if byte_budget == 0 {
        return Err(EstimationError::ZeroBudget);
    }

    let total = ranked.len();
    let bytes_per_glyph = source_size as f64 / total as f64;
    let trial_len = if bytes_per_glyph > 0.0 {
        (byte_budget as f64 / bytes_per_glyph).ceil() as usize
    } else {
        total
    };
    let (start, sample_len) = sample_window(total, trial_len.max(1));

    let mut subset: Vec<GlyphId> = Vec::with_capacity(sample_len + 1);
    subset.push(VOID_GLYPH);
    subset.extend(ranked[start..start + sample_len].iter().map(|g| g.id));

    let sample = codec
        .encode(model, &subset, format)
        .map_err(EstimationError::SampleEncode)?;
    if sample.is_empty() {
        return Err(EstimationError::EmptySample);
    }

    let corrected = sample_len as f64 * (byte_budget as f64 / sample.len() as f64);
    let chunk_len = (corrected.round() as usize).max(1);
    debug!(
        "Calibration sample: {} glyphs from {} encoded to {} bytes, {} glyphs per chunk",
        sample_len,
        start,
        sample.len(),
        chunk_len
    );

    Ok(ChunkEstimate {
        bytes_per_glyph,
        sample_len,
        sample_bytes: sample.len(),
        chunk_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCodec;

    fn ranked(model: &FontModel) -> Vec<&Glyph> {
        model.addressable_glyphs().iter().collect()
    }

    #[test]
    fn test_sample_window_is_centred_and_clamped() {
        assert_eq!(sample_window(999, 200), (399, 200));
        assert_eq!(sample_window(10, 4), (3, 4));
        assert_eq!(sample_window(10, 50), (0, 10));
        assert_eq!(sample_window(1, 1), (0, 1));
    }

    #[test]
    fn test_calibration_corrects_naive_estimate() {
        // 999 addressable glyphs of 550 bytes plus 1000 bytes of overhead
        let codec = FakeCodec::uniform(999, 550, 1000);
        let model = codec.model.clone();
        let estimate =
            estimate_chunk_len(&codec, &model, &ranked(&model), 500_000, 100_000, FontFormat::Ttf)
                .unwrap();

        assert_eq!(estimate.sample_len, 200);
        assert_eq!(estimate.sample_bytes, 1000 + 200 * 550);
        // 200 * 100000 / 111000 = 180.18
        assert_eq!(estimate.chunk_len, 180);
        assert_eq!(codec.calls(), 1);
    }

    #[test]
    fn test_budget_larger_than_font_gives_whole_font() {
        let codec = FakeCodec::uniform(20, 100, 10);
        let model = codec.model.clone();
        let estimate =
            estimate_chunk_len(&codec, &model, &ranked(&model), 2_000, 1_000_000, FontFormat::Ttf)
                .unwrap();
        assert_eq!(estimate.sample_len, 20);
        assert!(estimate.chunk_len >= 20);
    }

    #[test]
    fn test_empty_sample_is_an_error() {
        // zero overhead and empty outlines encode to nothing
        let codec = FakeCodec::uniform(5, 0, 0);
        let model = codec.model.clone();
        let err = estimate_chunk_len(&codec, &model, &ranked(&model), 100, 10, FontFormat::Ttf)
            .unwrap_err();
        assert!(matches!(err, EstimationError::EmptySample));
    }

    #[test]
    fn test_no_glyphs_is_an_error() {
        let codec = FakeCodec::uniform(0, 10, 10);
        let model = codec.model.clone();
        let err = estimate_chunk_len(&codec, &model, &[], 100, 10, FontFormat::Ttf).unwrap_err();
        assert!(matches!(err, EstimationError::NoGlyphs));
        assert_eq!(codec.calls(), 0);
    }

    #[test]
    fn test_sample_encode_failure_is_reported() {
        let mut codec = FakeCodec::uniform(10, 10, 10);
        codec.fail_on = Some(5);
        let model = codec.model.clone();
        let err = estimate_chunk_len(&codec, &model, &ranked(&model), 1000, 10_000, FontFormat::Ttf)
            .unwrap_err();
        assert!(matches!(err, EstimationError::SampleEncode(_)));
    }
}
