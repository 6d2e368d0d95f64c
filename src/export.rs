//! Saving prompt documents and preparing prompt text for export.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::error::{PromptError, Result};
use crate::prompts::PromptDocument;

/// Base name used when no file has been loaded yet.
pub const DEFAULT_BASE_NAME: &str = "prompts";

/// Build `{base}_{YYYYMMDD}_{HHMMSS}_{mmm}.json` for the given instant.
///
/// `base` is the file name of `original` with a trailing `.json` removed,
/// or [`DEFAULT_BASE_NAME`] when nothing is left.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use prompt_writer::export::timestamped_file_name;
///
/// let at = NaiveDate::from_ymd_opt(2024, 3, 9)
///     .unwrap()
///     .and_hms_milli_opt(7, 5, 1, 42)
///     .unwrap();
/// assert_eq!(
///     timestamped_file_name(Some("foo.json"), at),
///     "foo_20240309_070501_042.json"
/// );
/// ```
pub fn timestamped_file_name(original: Option<&str>, at: NaiveDateTime) -> String {
    let name = original
        .map(|o| {
            Path::new(o)
                .file_name()
                .map_or_else(|| o.to_string(), |n| n.to_string_lossy().to_string())
        })
        .unwrap_or_default();
    let base = name.strip_suffix(".json").unwrap_or(&name);
    let base = if base.is_empty() {
        DEFAULT_BASE_NAME
    } else {
        base
    };
    format!("{base}_{}.json", at.format("%Y%m%d_%H%M%S_%3f"))
}

/// [`timestamped_file_name`] for the current local time.
pub fn suggested_file_name(original: Option<&str>) -> String {
    timestamped_file_name(original, Local::now().naive_local())
}

/// Escape `text` as a JSON string body, without the surrounding quotes.
///
/// Newlines, tabs, quotes and backslashes come out as escape sequences so the
/// result can be pasted between quotes in JSON source.
pub fn json_safe(text: &str) -> String {
    let quoted = serde_json::Value::String(text.to_string()).to_string();
    quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .map_or_else(|| quoted.clone(), ToString::to_string)
}

/// Write the document as pretty JSON to `path`.
///
/// The content goes to a sibling temporary file first and is renamed into
/// place, so a failed write leaves any existing file untouched.
///
/// # Errors
///
/// Returns [`PromptError::Write`] if the file cannot be written or moved.
pub fn write_document(path: &Path, doc: &PromptDocument) -> Result<()> {
    let to_write_error = |source| PromptError::Write {
        path: path.to_path_buf(),
        source,
    };
    let tmp = temp_path_for(path);
    let result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(doc.to_pretty_json().as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(to_write_error(err));
    }
    tracing::info!(path = %path.display(), entries = doc.len(), "saved prompt file");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "prompts".into(), |n| n.to_string_lossy().to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 58, 7)
            .unwrap()
    }

    #[test]
    fn test_timestamped_name_strips_json_extension() {
        assert_eq!(
            timestamped_file_name(Some("foo.json"), instant()),
            "foo_20251231_235958_007.json"
        );
    }

    #[test]
    fn test_timestamped_name_defaults_to_prompts() {
        assert_eq!(
            timestamped_file_name(None, instant()),
            "prompts_20251231_235958_007.json"
        );
        assert_eq!(
            timestamped_file_name(Some(".json"), instant()),
            "prompts_20251231_235958_007.json"
        );
    }

    #[test]
    fn test_timestamped_name_keeps_other_extensions() {
        assert_eq!(
            timestamped_file_name(Some("notes.txt"), instant()),
            "notes.txt_20251231_235958_007.json"
        );
    }

    #[test]
    fn test_timestamped_name_uses_file_name_of_path() {
        assert_eq!(
            timestamped_file_name(Some("/tmp/sets/agent.json"), instant()),
            "agent_20251231_235958_007.json"
        );
    }

    #[test]
    fn test_suggested_name_matches_pattern() {
        let name = suggested_file_name(Some("foo.json"));
        let stamp = name
            .strip_prefix("foo_")
            .and_then(|s| s.strip_suffix(".json"))
            .unwrap();
        let parts: Vec<&str> = stamp.split('_').collect();
        assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![8, 6, 3]);
        assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn test_json_safe_escapes_without_quotes() {
        assert_eq!(json_safe("say \"hi\"\nnext\tline\\"), r#"say \"hi\"\nnext\tline\\"#);
        assert_eq!(json_safe(""), "");
    }

    #[test]
    fn test_json_safe_keeps_unicode() {
        assert_eq!(json_safe("café ✓"), "café ✓");
    }

    #[test]
    fn test_write_document_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let doc = PromptDocument::from_json_str(r#"{"a": "x\ny", "b": ""}"#).unwrap();

        write_document(&path, &doc).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"a\""));
        assert_eq!(PromptDocument::from_json_str(&written).unwrap(), doc);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_document_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.json");
        let err = write_document(&path, &PromptDocument::new()).unwrap_err();
        assert!(matches!(err, PromptError::Write { .. }));
        assert!(!path.exists());
    }
}
