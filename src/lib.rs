//! fontsplit
//!
//! Splits one font into byte-size-bounded chunk files and writes a
//! stylesheet whose `unicode-range` rules let browsers fetch only the chunks
//! a page needs.
pub mod charset;
pub mod codec;
pub mod core;
pub mod errors;
pub mod font_source;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod split;
#[cfg(test)]
mod test_support;
