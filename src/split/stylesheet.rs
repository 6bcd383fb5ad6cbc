//! `@font-face` stylesheet assembly

use super::ChunkArtifact;
use crate::font_source::FontMetadata;
use std::fmt::Write as _;

/// Descriptor values shared by every rule of one stylesheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaceOptions {
    pub family: String,
    pub weight: String,
    pub style: String,
    pub display: String,
}

impl FontFaceOptions {
    /// Fill unset family and weight from the font's own metadata.
    pub fn resolve(
        family: Option<&str>,
        weight: Option<&str>,
        style: &str,
        display: &str,
        metadata: &FontMetadata,
    ) -> Self {
        Self {
            family: family
                .map(str::to_string)
                .unwrap_or_else(|| metadata.css_family()),
            weight: weight
                .map(str::to_string)
                .unwrap_or_else(|| metadata.weight_class.to_string()),
            style: style.to_string(),
            display: display.to_string(),
        }
    }
}

/// Metadata comment followed by one rule per chunk, in chunk order.
///
/// Chunks that cover no code point are skipped.
pub fn generate_stylesheet(
    artifacts: &[ChunkArtifact],
    metadata: &FontMetadata,
    options: &FontFaceOptions,
) -> String {
    let mut css = header(metadata);
    for artifact in artifacts {
        if artifact.code_points.is_empty() {
            continue;
        }
        css.push('\n');
        css.push_str(&font_face(artifact, options));
    }
    css
}

fn header(metadata: &FontMetadata) -> String {
    let mut out = String::from("/*\n");
    for (key, value) in metadata.entries() {
        // a stray terminator would end the comment early
        let _ = writeln!(out, " * {key}: {}", value.replace("*/", "* /"));
    }
    out.push_str(" */\n");
    out
}

fn font_face(artifact: &ChunkArtifact, options: &FontFaceOptions) -> String {
    format!(
        "@font-face {{\n\
         \x20   font-family: \"{family}\";\n\
         \x20   src: url(\"./{file}\") format(\"{format}\");\n\
         \x20   font-style: {style};\n\
         \x20   font-weight: {weight};\n\
         \x20   font-display: {display};\n\
         \x20   unicode-range: {range};\n\
         }}\n",
        family = quote_escape(&options.family),
        file = artifact.file_name,
        format = artifact.format.css_format(),
        style = options.style,
        weight = options.weight,
        display = options.display,
        range = unicode_range(&artifact.code_points),
    )
}

/// `U+<hex>` for every code point, comma separated
pub fn unicode_range(code_points: &[u32]) -> String {
    code_points
        .iter()
        .map(|cp| format!("U+{cp:X}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
