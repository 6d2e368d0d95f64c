use std::path::Path;
use std::time::Instant;

use crate::app::{App, Message, Model, ToastLevel};
use crate::clipboard::{CopyMode, copy_to_clipboard};
use crate::export;
use crate::prompts::PromptDocument;

impl App {
    /// Run the I/O a message asks for, after `update` has stored its state.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        match msg {
            Message::CopyJsonSafe(key) => copy_prompt(model, key, CopyMode::JsonSafe),
            Message::CopyFormatted(key) => copy_prompt(model, key, CopyMode::Formatted),
            Message::StartSave | Message::ConfirmSave => {
                if let Some(path) = model.pending_save.take() {
                    save_document(model, &path);
                }
            }
            Message::ConfirmOpen => {
                if let Some(path) = model.pending_open.take() {
                    open_document(model, &path);
                }
            }
            _ => {}
        }
        apply_pending_selection(model);
    }
}

/// Restore the selection recorded by a token insertion.
///
/// Dropped when the editor it was meant for is gone or now shows another key.
pub(super) fn apply_pending_selection(model: &mut Model) {
    let Some(pending) = model.pending_selection.take() else {
        return;
    };
    match model.editor.as_mut() {
        Some(editor) if editor.key == pending.key => {
            editor.buffer.set_selection(pending.start, pending.end);
            model.editor_ensure_cursor_visible();
        }
        _ => {
            tracing::debug!(key = %pending.key, "dropping stale selection restore");
        }
    }
}

fn copy_prompt(model: &mut Model, key: &str, mode: CopyMode) {
    let Some(text) = model.document.get(key) else {
        return;
    };
    let payload = mode.payload(text);
    match copy_to_clipboard(&payload) {
        Ok(()) => {
            tracing::debug!(key, ?mode, bytes = payload.len(), "copied prompt");
            model.flash_copy(key, mode, Instant::now());
        }
        Err(err) => {
            tracing::warn!(key, ?mode, error = %err, "clipboard write failed");
            model.show_toast(ToastLevel::Error, format!("Copy failed: {err}"));
        }
    }
}

fn save_document(model: &mut Model, path: &Path) {
    match export::write_document(path, &model.document) {
        Ok(()) => {
            model.file_path = Some(path.to_path_buf());
            model.dirty = false;
            let name = model.file_name().unwrap_or_else(|| path.display().to_string());
            model.show_toast(ToastLevel::Info, format!("Saved {name}"));
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "save failed");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}

fn open_document(model: &mut Model, path: &Path) {
    match PromptDocument::load(path) {
        Ok(document) => {
            let count = document.len();
            model.replace_document(document, path.to_path_buf());
            let name = model.file_name().unwrap_or_else(|| path.display().to_string());
            model.show_toast(ToastLevel::Info, format!("Loaded {count} prompts from {name}"));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "open failed");
            model.show_toast(ToastLevel::Error, err.to_string());
        }
    }
}
