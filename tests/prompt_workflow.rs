use std::fs;

use prompt_writer::clipboard::CopyMode;
use prompt_writer::editor::{MarkdownToken, insert};
use prompt_writer::error::PromptError;
use prompt_writer::export::{json_safe, timestamped_file_name, write_document};
use prompt_writer::prompts::PromptDocument;
use tempfile::tempdir;

#[test]
fn load_edit_save_reload_keeps_order_and_text() {
    let dir = tempdir().unwrap();
    let source = dir.path().join("prompts.json");
    fs::write(
        &source,
        r#"{"system": "You are terse.", "user": "Summarize this", "notes": ""}"#,
    )
    .unwrap();

    let mut doc = PromptDocument::load(&source).unwrap();
    let value = doc.get("user").unwrap().to_string();
    let (prefix, suffix) = MarkdownToken::Bold.pair();
    let edited = insert(&value, 0, 9, prefix, suffix).unwrap();
    assert!(doc.set_value("user", edited.text));
    doc.add_key("extra").unwrap();

    let at = chrono::NaiveDate::from_ymd_opt(2025, 1, 2)
        .unwrap()
        .and_hms_milli_opt(3, 4, 5, 6)
        .unwrap();
    let name = timestamped_file_name(Some("prompts.json"), at);
    assert_eq!(name, "prompts_20250102_030405_006.json");
    let target = dir.path().join(name);
    write_document(&target, &doc).unwrap();

    let reloaded = PromptDocument::load(&target).unwrap();
    assert_eq!(
        reloaded.keys().collect::<Vec<_>>(),
        vec!["system", "user", "notes", "extra"]
    );
    assert_eq!(reloaded.get("user"), Some("**Summarize** this"));
    assert_eq!(reloaded, doc);

    // The original file is left alone.
    let original = PromptDocument::load(&source).unwrap();
    assert_eq!(original.get("user"), Some("Summarize this"));
}

#[test]
fn saved_file_is_pretty_printed() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.json");
    let doc = PromptDocument::from_json_str(r#"{"a":"line one\nline two"}"#).unwrap();
    write_document(&target, &doc).unwrap();
    let written = fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("{\n  \"a\": "), "{written}");
    assert!(written.contains("line one\\nline two"));
}

#[test]
fn overwriting_replaces_previous_content() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("out.json");
    fs::write(&target, "old").unwrap();
    let doc = PromptDocument::from_json_str(r#"{"k": "v"}"#).unwrap();
    write_document(&target, &doc).unwrap();
    assert_eq!(PromptDocument::load(&target).unwrap(), doc);
}

#[test]
fn rejects_documents_that_are_not_prompt_maps() {
    assert!(matches!(
        PromptDocument::from_json_str("[1, 2]"),
        Err(PromptError::NotAnObject)
    ));
    assert!(matches!(
        PromptDocument::from_json_str(r#"{"n": 3}"#),
        Err(PromptError::NonStringValue { .. })
    ));
    assert!(matches!(
        PromptDocument::from_json_str("{"),
        Err(PromptError::MalformedJson(_))
    ));
}

#[test]
fn missing_file_reports_read_error() {
    let dir = tempdir().unwrap();
    let err = PromptDocument::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, PromptError::Read { .. }));
}

#[test]
fn copy_payloads_match_modes() {
    let text = "Say \"hi\"\n\tthen stop";
    assert_eq!(CopyMode::Formatted.payload(text), text);
    assert_eq!(CopyMode::JsonSafe.payload(text), json_safe(text));
    assert_eq!(json_safe(text), r#"Say \"hi\"\n\tthen stop"#);
}
