//! JSON summary of one run

use crate::font_source::FontMetadata;
use crate::split::ChunkArtifact;
use serde::Serialize;

/// File name of the report inside the output directory
pub const REPORT_FILE_NAME: &str = "reporter.json";

/// Report body: the run configuration, the font's metadata as `message`,
/// and one entry per chunk
#[derive(Debug, Serialize)]
pub struct RunReport<'a, C: Serialize> {
    pub config: &'a C,
    pub message: &'a FontMetadata,
    pub data: Vec<ReportEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Chunk file name
    pub name: String,
    pub size: usize,
    /// Covered code points as text
    pub characters: String,
}

impl<'a, C: Serialize> RunReport<'a, C> {
    pub fn new(config: &'a C, metadata: &'a FontMetadata, artifacts: &[ChunkArtifact]) -> Self {
        Self {
            config,
            message: metadata,
            data: artifacts
                .iter()
                .map(|artifact| ReportEntry {
                    name: artifact.file_name.clone(),
                    size: artifact.size,
                    characters: artifact.characters(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_source::FontFormat;
    use serde_json::json;

    #[test]
    fn test_report_shape() {
        let metadata = FontMetadata {
            font_family: Some("Sample".to_string()),
            weight_class: 400,
            ..Default::default()
        };
        let artifacts = vec![ChunkArtifact {
            index: 0,
            hash: "00".repeat(32),
            file_name: format!("{}.woff", "00".repeat(32)),
            format: FontFormat::Woff,
            size: 321,
            code_points: vec![0x41, 0x4E00],
        }];
        let config = json!({ "chunkSize": 1024 });

        let value = serde_json::to_value(RunReport::new(&config, &metadata, &artifacts)).unwrap();

        assert_eq!(value["config"]["chunkSize"], 1024);
        assert_eq!(value["message"]["fontFamily"], "Sample");
        assert_eq!(value["data"][0]["name"], artifacts[0].file_name.as_str());
        assert_eq!(value["data"][0]["size"], 321);
        assert_eq!(value["data"][0]["characters"], "A一");
    }
}
