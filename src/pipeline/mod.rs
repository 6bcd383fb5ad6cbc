//! Run orchestration
//!
//! Stages run strictly in order, each finishing completely before the next
//! starts. The first failure aborts the run and is returned tagged with its
//! stage. Nothing is retried.

use crate::charset::PriorityList;
use crate::codec::{CodecError, FontCodec};
use crate::core::config::SplitConfig;
use crate::errors::{SplitError, Stage, StageError};
use crate::font_source::{FontFormat, FontMetadata, FontModel};
use crate::output::{
    render_preview, OutputDir, PersistSummary, RunReport, PREVIEW_FILE_NAME, REPORT_FILE_NAME,
};
use crate::split::{
    estimate_chunk_len, generate_stylesheet, name_chunk, partition, rank_glyphs,
    serialize_chunks, ChunkArtifact, ChunkEstimate, FontFaceOptions,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Wall-clock duration of one completed stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub stage: Stage,
    pub duration: Duration,
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Written chunks in partition order
    pub artifacts: Vec<ChunkArtifact>,
    pub metadata: FontMetadata,
    pub estimate: ChunkEstimate,
    pub persisted: PersistSummary,
    pub stylesheet: PathBuf,
    pub preview: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub timings: Vec<StageTiming>,
}

impl PipelineOutcome {
    pub fn total_duration(&self) -> Duration {
        self.timings.iter().map(|t| t.duration).sum()
    }
}

#[derive(Default)]
struct StageClock {
    timings: Vec<StageTiming>,
}

impl StageClock {
    fn start(&self, stage: Stage) -> Instant {
        info!("Stage '{}' started", stage);
        Instant::now()
    }

    fn finish<T, E: Into<SplitError>>(
        &mut self,
        stage: Stage,
        started: Instant,
        result: Result<T, E>,
    ) -> Result<T, StageError> {
        let duration = started.elapsed();
        match result {
            Ok(value) => {
                info!(
                    "Stage '{}' finished in {} ms",
                    stage,
                    duration.as_millis()
                );
                self.timings.push(StageTiming { stage, duration });
                Ok(value)
            }
            Err(err) => {
                let err = StageError::new(stage, err);
                warn!("{}", err);
                Err(err)
            }
        }
    }

    fn run<T, E: Into<SplitError>>(
        &mut self,
        stage: Stage,
        work: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, StageError> {
        let started = self.start(stage);
        let result = work();
        self.finish(stage, started, result)
    }
}

/// Split the configured font into chunks and write every output.
pub async fn run_pipeline(
    config: &SplitConfig,
    codec: &dyn FontCodec,
    priority: &PriorityList,
) -> Result<PipelineOutcome, StageError> {
    let mut clock = StageClock::default();

    let started = clock.start(Stage::LoadFont);
    let loaded = load_font(config, codec).await;
    let (model, source_size) = clock.finish(Stage::LoadFont, started, loaded)?;
    info!(
        "Loaded {:?}: {} glyphs, {} bytes",
        model.metadata.get_display_name(),
        model.glyph_count(),
        source_size
    );
    let metadata = model.metadata.clone();

    let ranked = clock.run(Stage::RankGlyphs, || {
        Ok::<_, SplitError>(rank_glyphs(model.addressable_glyphs(), priority))
    })?;

    let estimate = clock.run(Stage::EstimateChunkSize, || {
        estimate_chunk_len(
            codec,
            &model,
            &ranked,
            source_size,
            config.chunk_size,
            config.target_format,
        )
    })?;

    let chunks = clock.run(Stage::PartitionGlyphs, || {
        Ok::<_, SplitError>(partition(&ranked, estimate.chunk_len))
    })?;
    info!(
        "{} glyphs per chunk, {} chunks",
        estimate.chunk_len,
        chunks.len()
    );
    drop(ranked);

    let encoded = clock.run(Stage::SerializeChunks, || {
        serialize_chunks(codec, model, &chunks, config.target_format)
    })?;

    let started = clock.start(Stage::PersistChunks);
    let persisted = persist(config, encoded).await;
    let (out, artifacts, summary) = clock.finish(Stage::PersistChunks, started, persisted)?;

    let options = FontFaceOptions::resolve(
        config.css.family.as_deref(),
        config.css.weight.as_deref(),
        &config.css.style,
        &config.css.display,
        &metadata,
    );

    let started = clock.start(Stage::WriteStylesheet);
    let css = generate_stylesheet(&artifacts, &metadata, &options);
    let written = out.write_text(&config.stylesheet_file_name(), &css).await;
    let stylesheet = clock.finish(Stage::WriteStylesheet, started, written)?;

    let preview = if config.preview {
        let started = clock.start(Stage::WritePreview);
        let html = render_preview(&config.stylesheet_file_name(), &options.family, &artifacts);
        let written = out.write_text(PREVIEW_FILE_NAME, &html).await;
        Some(clock.finish(Stage::WritePreview, started, written)?)
    } else {
        None
    };

    let report = if config.report {
        let started = clock.start(Stage::WriteReport);
        let body = RunReport::new(config, &metadata, &artifacts);
        let written = out.write_json(REPORT_FILE_NAME, &body).await;
        Some(clock.finish(Stage::WriteReport, started, written)?)
    } else {
        None
    };

    Ok(PipelineOutcome {
        artifacts,
        metadata,
        estimate,
        persisted: summary,
        stylesheet,
        preview,
        report,
        timings: clock.timings,
    })
}

async fn load_font(
    config: &SplitConfig,
    codec: &dyn FontCodec,
) -> Result<(FontModel, usize), SplitError> {
    let bytes = tokio::fs::read(&config.source)
        .await
        .map_err(|source| SplitError::Read {
            path: config.source.clone(),
            source,
        })?;
    let format = config
        .source_format
        .or_else(|| FontFormat::detect(&bytes))
        .ok_or_else(|| {
            SplitError::Decode(CodecError::Unsupported(
                "unrecognized font container".to_string(),
            ))
        })?;
    let model = codec.decode(&bytes, format).map_err(SplitError::Decode)?;
    Ok((model, bytes.len()))
}

async fn persist(
    config: &SplitConfig,
    encoded: Vec<crate::split::EncodedChunk>,
) -> Result<(OutputDir, Vec<ChunkArtifact>, PersistSummary), SplitError> {
    let out = OutputDir::create(&config.out_dir).await?;
    let named = encoded
        .into_iter()
        .map(|chunk| name_chunk(chunk, config.target_format))
        .collect();
    let (artifacts, summary) = out.persist_chunks(named).await?;
    Ok((out, artifacts, summary))
}
