//! Static preview page for a generated stylesheet

use crate::split::ChunkArtifact;
use std::fmt::Write as _;

/// File name of the preview page inside the output directory
pub const PREVIEW_FILE_NAME: &str = "index.html";

/// Characters shown per chunk
const SAMPLE_LEN: usize = 48;

/// Build an HTML page that loads `stylesheet` and renders a line of
/// each chunk's characters in `family`.
pub fn render_preview(stylesheet: &str, family: &str, artifacts: &[ChunkArtifact]) -> String {
    let mut rows = String::new();
    for artifact in artifacts {
        let sample: String = artifact
            .characters()
            .chars()
            .filter(|c| !c.is_control())
            .take(SAMPLE_LEN)
            .collect();
        if sample.is_empty() {
            continue;
        }
        let _ = writeln!(
            rows,
            "    <section>\n      <h2>#{} {} &middot; {} bytes</h2>\n      <p class=\"sample\">{}</p>\n    </section>",
            artifact.index,
            escape_html(&artifact.file_name),
            artifact.size,
            escape_html(&sample)
        );
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         \x20 <meta charset=\"utf-8\">\n\
         \x20 <title>{title}</title>\n\
         \x20 <link rel=\"stylesheet\" href=\"./{stylesheet}\">\n\
         \x20 <style>\n\
         \x20   body {{ font-family: system-ui, sans-serif; margin: 2rem; }}\n\
         \x20   h2 {{ font-size: 0.8rem; color: #666; }}\n\
         \x20   .sample {{ font-family: \"{css_family}\"; font-size: 2rem; }}\n\
         \x20 </style>\n\
         </head>\n\
         <body>\n\
         \x20 <h1>{title}</h1>\n\
         {rows}\
         </body>\n\
         </html>\n",
        title = escape_html(family),
        stylesheet = escape_html(stylesheet),
        css_family = family.replace('\\', "\\\\").replace('"', "\\\""),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
