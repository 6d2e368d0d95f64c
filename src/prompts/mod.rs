//! The prompt collection being edited.
//!
//! A [`PromptDocument`] is a flat, ordered map from key to prompt text,
//! loaded from and saved to a single JSON object.

use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::{PromptError, Result};

/// An ordered collection of named prompts.
///
/// Keys are unique. Order follows the source file, with added keys appended,
/// and is kept when the document is written back out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDocument {
    entries: Vec<(String, String)>,
}

impl PromptDocument {
    /// Create an empty document.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse a JSON object of string values.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::MalformedJson`] for invalid JSON,
    /// [`PromptError::NotAnObject`] when the top level is not an object and
    /// [`PromptError::NonStringValue`] for the first non-string value.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(source)?;
        let Value::Object(map) = value else {
            return Err(PromptError::NotAnObject);
        };
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            match value {
                Value::String(text) => entries.push((key, text)),
                _ => return Err(PromptError::NonStringValue { key }),
            }
        }
        Ok(Self { entries })
    }

    /// Read and parse a prompt file.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Read`] when the file cannot be read, otherwise
    /// the errors of [`from_json_str`](Self::from_json_str).
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_json_str(&source)?;
        tracing::debug!(path = %path.display(), entries = doc.len(), "loaded prompt file");
        Ok(doc)
    }

    /// Serialize as JSON indented with two spaces.
    pub fn to_pretty_json(&self) -> String {
        // Serializing string pairs into a String cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Number of prompts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document holds no prompts.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a prompt named `key` exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Index of `key` in display order.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Text of the prompt named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The key at `index` in display order.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(k, _)| k.as_str())
    }

    /// Prompt names in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Name and text pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace the text of an existing prompt.
    ///
    /// Returns `false` (and changes nothing) when `key` is absent.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Append a new, empty prompt named `name`.
    ///
    /// The name is stored as typed; only the emptiness check trims it.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::EmptyKey`] for a blank name and
    /// [`PromptError::DuplicateKey`] when the key already exists. The
    /// document is unchanged in both cases.
    pub fn add_key(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(PromptError::EmptyKey);
        }
        if self.contains_key(name) {
            return Err(PromptError::DuplicateKey(name.to_string()));
        }
        self.entries.push((name.to_string(), String::new()));
        Ok(())
    }

    /// Remove `key`, keeping the order of the remaining prompts.
    pub fn remove_key(&mut self, key: &str) -> Option<String> {
        let index = self.position(key)?;
        Some(self.entries.remove(index).1)
    }
}

impl Serialize for PromptDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PromptDocument {
        PromptDocument::from_json_str(r#"{"greeting": "Hello", "system": "Be **brief**."}"#)
            .unwrap()
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let doc = PromptDocument::from_json_str(r#"{"b": "2", "a": "1", "c": "3"}"#).unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_empty_object() {
        let doc = PromptDocument::from_json_str("{}").unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = PromptDocument::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, PromptError::MalformedJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON file"));
    }

    #[test]
    fn test_array_is_not_an_object() {
        let err = PromptDocument::from_json_str(r#"["a"]"#).unwrap_err();
        assert!(matches!(err, PromptError::NotAnObject));
    }

    #[test]
    fn test_nested_value_is_rejected_with_key() {
        let err = PromptDocument::from_json_str(r#"{"ok": "x", "bad": {"n": 1}}"#).unwrap_err();
        match err {
            PromptError::NonStringValue { key } => assert_eq!(key, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pretty_json_uses_two_space_indent() {
        let doc = sample();
        assert_eq!(
            doc.to_pretty_json(),
            "{\n  \"greeting\": \"Hello\",\n  \"system\": \"Be **brief**.\"\n}"
        );
    }

    #[test]
    fn test_round_trip_preserves_mapping() {
        let mut doc = sample();
        doc.set_value("greeting", "line one\nline \"two\"\ttab");
        let reloaded = PromptDocument::from_json_str(&doc.to_pretty_json()).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn test_add_key_appends_empty_prompt() {
        let mut doc = sample();
        doc.add_key("new").unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.key_at(2), Some("new"));
        assert_eq!(doc.get("new"), Some(""));
    }

    #[test]
    fn test_add_existing_key_is_rejected_and_unchanged() {
        let mut doc = sample();
        let before = doc.clone();
        let err = doc.add_key("greeting").unwrap_err();
        assert!(matches!(err, PromptError::DuplicateKey(_)));
        assert_eq!(err.to_string(), "Key already exists");
        assert_eq!(doc, before);
    }

    #[test]
    fn test_add_key_with_empty_value_is_still_a_duplicate() {
        let mut doc = PromptDocument::from_json_str(r#"{"blank": ""}"#).unwrap();
        assert!(matches!(
            doc.add_key("blank"),
            Err(PromptError::DuplicateKey(_))
        ));
    }

    #[test]
    fn test_add_blank_key_is_rejected() {
        let mut doc = sample();
        assert!(matches!(doc.add_key("   "), Err(PromptError::EmptyKey)));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_remove_key_removes_only_that_key() {
        let mut doc = PromptDocument::from_json_str(r#"{"a": "1", "b": "2", "c": "3"}"#).unwrap();
        assert_eq!(doc.remove_key("b"), Some("2".to_string()));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(doc.get("a"), Some("1"));
        assert_eq!(doc.get("c"), Some("3"));
    }

    #[test]
    fn test_set_value_on_missing_key_is_noop() {
        let mut doc = sample();
        assert!(!doc.set_value("missing", "x"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_load_reports_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = PromptDocument::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, PromptError::Read { .. }));
    }
}
