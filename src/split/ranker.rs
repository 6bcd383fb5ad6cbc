//! Glyph priority ordering

use crate::charset::PriorityList;
use crate::font_source::Glyph;

/// Order glyphs by the priority rank of their first code point.
///
/// `glyphs` must not contain the void glyph. Glyphs without a code point, or
/// whose first code point is unlisted, go last. The sort is stable, so equal
/// ranks keep their source order.
pub fn rank_glyphs<'a>(glyphs: &'a [Glyph], priority: &PriorityList) -> Vec<&'a Glyph> {
    let mut ranked: Vec<&Glyph> = glyphs.iter().collect();
    if priority.is_empty() {
        return ranked;
    }
    ranked.sort_by_key(|glyph| {
        glyph
            .first_code_point()
            .and_then(|cp| priority.rank(cp))
            .unwrap_or(usize::MAX)
    });
    ranked
}
