//! Font source data structures
//!
//! This module contains the decoded representation of the font being split,
//! as opposed to the encoded chunk buffers produced from it.

pub mod format;
pub mod metadata;
pub mod model;

pub use format::FontFormat;
pub use metadata::FontMetadata;
pub use model::{FontModel, Glyph, GlyphId, GlyphOutline, SfntTables};
