//! Writing run outputs to the output directory
//!
//! Chunk files are written concurrently on a `JoinSet`. Every write is joined
//! before `persist_chunks` returns, so callers only ever see artifacts whose
//! bytes are on disk.

use crate::errors::SplitError;
use crate::split::{ChunkArtifact, NamedChunk};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Totals accumulated while persisting one run's chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistSummary {
    pub files: usize,
    pub total_bytes: u64,
}

/// Output directory of one run
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create the directory if needed.
    pub async fn create(root: &Path) -> Result<Self, SplitError> {
        fs::create_dir_all(root)
            .await
            .map_err(|source| SplitError::Persistence {
                path: root.to_path_buf(),
                source,
            })?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write every chunk and wait for all writes.
    ///
    /// Returns the artifacts sorted by chunk index. If any write fails the
    /// remaining writes still finish, then the first failure is returned.
    pub async fn persist_chunks(
        &self,
        chunks: Vec<NamedChunk>,
    ) -> Result<(Vec<ChunkArtifact>, PersistSummary), SplitError> {
        let mut writes = JoinSet::new();
        for chunk in chunks {
            let path = self.root.join(&chunk.artifact.file_name);
            writes.spawn(async move {
                write_file(&path, &chunk.bytes).await?;
                Ok::<_, SplitError>(chunk.artifact)
            });
        }

        let mut artifacts = Vec::with_capacity(writes.len());
        let mut summary = PersistSummary::default();
        let mut first_error = None;
        while let Some(joined) = writes.join_next().await {
            let result = joined.unwrap_or_else(|err| {
                Err(SplitError::Persistence {
                    path: self.root.clone(),
                    source: std::io::Error::other(err),
                })
            });
            match result {
                Ok(artifact) => {
                    summary.files += 1;
                    summary.total_bytes += artifact.size as u64;
                    info!(
                        "Wrote chunk {} {} ({})",
                        artifact.index,
                        &artifact.hash[..artifact.hash.len().min(8)],
                        format_size(artifact.size as u64)
                    );
                    artifacts.push(artifact);
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
        artifacts.sort_by_key(|artifact| artifact.index);
        info!(
            "Persisted {} chunks, {} total",
            summary.files,
            format_size(summary.total_bytes)
        );
        Ok((artifacts, summary))
    }

    /// Write a text file under the output directory.
    pub async fn write_text(&self, file_name: &str, contents: &str) -> Result<PathBuf, SplitError> {
        let path = self.root.join(file_name);
        write_file(&path, contents.as_bytes()).await?;
        debug!("Wrote {:?}", path);
        Ok(path)
    }

    /// Pretty-print `value` as JSON into the output directory.
    pub async fn write_json<T: Serialize>(
        &self,
        file_name: &str,
        value: &T,
    ) -> Result<PathBuf, SplitError> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_text(file_name, &json).await
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), SplitError> {
    let persistence = |source| SplitError::Persistence {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(path).await.map_err(persistence)?;
    file.write_all(bytes).await.map_err(persistence)?;
    file.flush().await.map_err(persistence)?;
    file.sync_all().await.map_err(persistence)?;
    Ok(())
}

/// Human-readable byte count, e.g. `1.5 KiB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
