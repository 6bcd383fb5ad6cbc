//! Glyph priority order
//!
//! A `PriorityList` ranks code points by how early a page is likely to need
//! them. Code points that are not listed rank after every listed one.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Printable ASCII, CJK punctuation and the most frequent Han characters,
/// followed by Latin-1 and common typographic punctuation.
const DEFAULT_ORDER: &str = include_str!("default.txt");

/// Ordered code point preference list
#[derive(Debug, Clone, Default)]
pub struct PriorityList {
    ranks: HashMap<u32, usize>,
}

impl PriorityList {
    /// Build a list from code points in preference order.
    ///
    /// A repeated code point keeps its first position.
    pub fn new(code_points: impl IntoIterator<Item = u32>) -> Self {
        let mut ranks = HashMap::new();
        for code_point in code_points {
            let next = ranks.len();
            ranks.entry(code_point).or_insert(next);
        }
        Self { ranks }
    }

    /// A list that ranks nothing, leaving glyph order untouched.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn default_list() -> Self {
        Self::from_text(DEFAULT_ORDER)
    }

    /// Characters of `text` in order; line breaks and other control
    /// characters are ignored.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().filter(|c| !c.is_control()).map(u32::from))
    }

    /// JSON array, possibly nested, of code point numbers or strings.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("priority list is not valid JSON")?;
        let mut code_points = Vec::new();
        flatten(&value, &mut code_points)?;
        Ok(Self::new(code_points))
    }

    /// Load a priority file: `.json` files are parsed as JSON, anything
    /// else as plain UTF-8 text.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read priority list {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let list = if is_json {
            Self::from_json(&text)
                .with_context(|| format!("failed to parse priority list {}", path.display()))?
        } else {
            Self::from_text(&text)
        };
        debug!("Loaded {} priority code points from {:?}", list.len(), path);
        Ok(list)
    }

    /// Position of `code_point` in the list, if listed
    pub fn rank(&self, code_point: u32) -> Option<usize> {
        self.ranks.get(&code_point).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

fn flatten(value: &Value, out: &mut Vec<u32>) -> Result<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out)?;
            }
        }
        Value::Number(number) => {
            let code_point = number
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .filter(|&n| char::from_u32(n).is_some())
                .with_context(|| format!("{number} is not a Unicode scalar value"))?;
            out.push(code_point);
        }
        Value::String(text) => out.extend(text.chars().map(u32::from)),
        other => anyhow::bail!("unexpected {other} in priority list"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_position_wins() {
        let list = PriorityList::new([0x41, 0x42, 0x41, 0x43]);
        assert_eq!(list.rank(0x41), Some(0));
        assert_eq!(list.rank(0x42), Some(1));
        assert_eq!(list.rank(0x43), Some(2));
        assert_eq!(list.rank(0x44), None);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_text_skips_line_breaks() {
        let list = PriorityList::from_text("ab\r\nc");
        assert_eq!(list.rank('c' as u32), Some(2));
        assert_eq!(list.rank('\n' as u32), None);
    }

    #[test]
    fn test_json_accepts_nested_numbers_and_strings() {
        let list = PriorityList::from_json(r#"[[30340, 19968], "是", [[65]]]"#).unwrap();
        assert_eq!(list.rank(0x7684), Some(0)); // 的
        assert_eq!(list.rank(0x4E00), Some(1)); // 一
        assert_eq!(list.rank(0x662F), Some(2)); // 是
        assert_eq!(list.rank(0x41), Some(3));
    }

    #[test]
    fn test_json_rejects_non_scalar_values() {
        assert!(PriorityList::from_json("[55296]").is_err()); // lone surrogate
        assert!(PriorityList::from_json("[true]").is_err());
        assert!(PriorityList::from_json("{").is_err());
    }

    #[test]
    fn test_default_list_starts_with_ascii() {
        let list = PriorityList::default_list();
        assert_eq!(list.rank(' ' as u32), Some(0));
        assert_eq!(list.rank('A' as u32), Some(33));
        assert!(list.rank('的' as u32).is_some());
        assert!(list.rank('\n' as u32).is_none());
    }

    #[test]
    fn test_load_picks_parser_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("order.json");
        std::fs::write(&json, "[66, 65]").unwrap();
        let text = dir.path().join("order.txt");
        std::fs::write(&text, "[66, 65]").unwrap();

        assert_eq!(PriorityList::load(&json).unwrap().rank(0x41), Some(1));
        assert_eq!(PriorityList::load(&text).unwrap().rank('[' as u32), Some(0));
    }
}
