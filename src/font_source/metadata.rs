//! Font-level naming and style information
//!
//! This module holds the descriptive data read from a font's `name` and
//! `OS/2` tables. It feeds the stylesheet header, the default CSS family and
//! weight, and the JSON report.

use serde::{Deserialize, Serialize};

/// Font information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetadata {
    pub copyright: Option<String>,
    pub font_family: Option<String>,
    pub font_sub_family: Option<String>,
    pub unique_sub_family: Option<String>,
    pub full_name: Option<String>,
    pub version: Option<String>,
    pub post_script_name: Option<String>,
    pub preferred_family: Option<String>,
    pub preferred_sub_family: Option<String>,
    /// `usWeightClass` from `OS/2`, 400 when the table is absent
    pub weight_class: u16,
    pub italic: bool,
}

impl FontMetadata {
    /// Family name to use in CSS when the caller does not override it.
    ///
    /// The typographic family wins over the legacy family since the legacy
    /// one folds weight names into the family for style-linking.
    pub fn css_family(&self) -> String {
        self.preferred_family
            .as_deref()
            .or(self.font_family.as_deref())
            .or(self.full_name.as_deref())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Untitled")
            .to_string()
    }

    /// Get a display name combining family and style names
    pub fn get_display_name(&self) -> String {
        let family = self.css_family();
        match self
            .preferred_sub_family
            .as_deref()
            .or(self.font_sub_family.as_deref())
        {
            Some(style) if !style.is_empty() => format!("{family} {style}"),
            _ => family,
        }
    }

    /// Non-empty name fields as `(key, value)` pairs in `name` table order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("copyright", &self.copyright),
            ("fontFamily", &self.font_family),
            ("fontSubFamily", &self.font_sub_family),
            ("uniqueSubFamily", &self.unique_sub_family),
            ("fullName", &self.full_name),
            ("version", &self.version),
            ("postScriptName", &self.post_script_name),
            ("preferredFamily", &self.preferred_family),
            ("preferredSubFamily", &self.preferred_sub_family),
        ];

        let mut entries: Vec<(&'static str, String)> = fields
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v.clone())))
            .collect();
        entries.push(("weightClass", self.weight_class.to_string()));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_family_prefers_typographic_family() {
        let metadata = FontMetadata {
            font_family: Some("Demo Light".to_string()),
            preferred_family: Some("Demo".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.css_family(), "Demo");
    }

    #[test]
    fn test_css_family_falls_back() {
        assert_eq!(FontMetadata::default().css_family(), "Untitled");

        let metadata = FontMetadata {
            full_name: Some("Only Full".to_string()),
            ..Default::default()
        };
        assert_eq!(metadata.css_family(), "Only Full");
    }

    #[test]
    fn test_entries_skip_missing_fields() {
        let metadata = FontMetadata {
            font_family: Some("Demo".to_string()),
            version: Some("Version 1.000".to_string()),
            weight_class: 700,
            ..Default::default()
        };
        let entries = metadata.entries();
        assert_eq!(
            entries,
            vec![
                ("fontFamily", "Demo".to_string()),
                ("version", "Version 1.000".to_string()),
                ("weightClass", "700".to_string()),
            ]
        );
    }
}
