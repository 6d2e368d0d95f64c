use std::path::PathBuf;

use crate::app::Model;
use crate::app::model::{EditorState, Focus, Overlay, PendingSelection, ToastLevel};
use crate::editor::{Direction, EditorBuffer, MarkdownToken};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Entry list
    /// Highlight the previous entry
    SelectPrev,
    /// Highlight the next entry
    SelectNext,
    /// Highlight the entry at an index
    SelectIndex(usize),
    /// Attach an editor to the highlighted entry
    FocusEditor,
    /// Detach the editor and return to the list
    FocusList,

    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert pasted text at the cursor
    EditorInsertStr(String),
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Split line at cursor (Enter)
    EditorSplitLine,
    /// Move cursor in a direction
    EditorMoveCursor(Direction),
    /// Move cursor while extending the selection (Shift+arrows)
    EditorExtendSelection(Direction),
    /// Select the whole prompt
    EditorSelectAll,
    /// Move cursor to beginning of line (Home)
    EditorMoveHome,
    /// Move cursor to end of line (End)
    EditorMoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    EditorMoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    EditorMoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    EditorMoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    EditorMoveToEnd,
    /// Wrap the selection of the given prompt in a markdown token
    InsertToken(String, MarkdownToken),

    // Preview
    /// Copy a prompt JSON-escaped
    CopyJsonSafe(String),
    /// Copy a prompt as written
    CopyFormatted(String),
    /// Scroll preview up by n lines
    PreviewScrollUp(usize),
    /// Scroll preview down by n lines
    PreviewScrollDown(usize),
    /// Show or hide the preview pane
    TogglePreview,

    // Keys
    StartAddKey,
    AddKeyInput(String),
    ConfirmAddKey,
    CancelAddKey,
    /// Ask for confirmation before deleting a key
    RequestDelete(String),
    ConfirmDelete,
    CancelDelete,

    // Files
    StartSave,
    SavePathInput(String),
    ConfirmSave,
    CancelSave,
    StartOpen,
    OpenPathInput(String),
    ConfirmOpen,
    CancelOpen,

    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// No side effects should occur in this function.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Reset confirmation on any action other than the confirmed one.
    // StartSave preserves it so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::StartSave) {
        model.quit_confirmed = false;
    }

    match msg {
        // Entry list
        Message::SelectPrev => {
            let index = model.selected.saturating_sub(1);
            select(&mut model, index);
        }
        Message::SelectNext => {
            let index = model.selected + 1;
            select(&mut model, index);
        }
        Message::SelectIndex(index) => {
            select(&mut model, index);
        }
        Message::FocusEditor => {
            if let Some(key) = model.selected_key().map(ToString::to_string) {
                let text = model.document.get(&key).unwrap_or_default();
                let mut buffer = EditorBuffer::from_text(text);
                buffer.move_to_end();
                model.editor = Some(EditorState {
                    key,
                    buffer,
                    scroll_offset: 0,
                });
                model.focus = Focus::Editor;
                model.editor_ensure_cursor_visible();
            }
        }
        Message::FocusList => {
            model.sync_editor_to_document();
            model.editor = None;
            model.pending_selection = None;
            model.focus = Focus::List;
        }

        // Editor
        Message::EditorInsertChar(ch) => edit(&mut model, |buf| buf.insert_char(ch)),
        Message::EditorInsertStr(text) => edit(&mut model, |buf| buf.insert_str(&text)),
        Message::EditorDeleteBack => edit(&mut model, |buf| {
            buf.delete_back();
        }),
        Message::EditorDeleteForward => edit(&mut model, |buf| {
            buf.delete_forward();
        }),
        Message::EditorSplitLine => edit(&mut model, EditorBuffer::split_line),
        Message::EditorMoveCursor(dir) => edit(&mut model, |buf| buf.move_cursor(dir)),
        Message::EditorExtendSelection(dir) => {
            edit(&mut model, |buf| buf.extend_selection(dir));
        }
        Message::EditorSelectAll => edit(&mut model, EditorBuffer::select_all),
        Message::EditorMoveHome => edit(&mut model, EditorBuffer::move_home),
        Message::EditorMoveEnd => edit(&mut model, EditorBuffer::move_end),
        Message::EditorMoveWordLeft => edit(&mut model, EditorBuffer::move_word_left),
        Message::EditorMoveWordRight => edit(&mut model, EditorBuffer::move_word_right),
        Message::EditorMoveToStart => edit(&mut model, EditorBuffer::move_to_start),
        Message::EditorMoveToEnd => edit(&mut model, EditorBuffer::move_to_end),
        Message::InsertToken(key, token) => {
            insert_token(&mut model, key, token);
        }

        // Preview
        Message::CopyJsonSafe(_) | Message::CopyFormatted(_) => {
            // Clipboard writes happen in the effect phase.
        }
        Message::PreviewScrollUp(n) => {
            model.preview_scroll = model.preview_scroll.saturating_sub(n);
        }
        Message::PreviewScrollDown(n) => {
            model.preview_scroll = (model.preview_scroll + n).min(model.max_preview_scroll());
        }
        Message::TogglePreview => {
            model.preview_visible = !model.preview_visible;
            model.preview_scroll = 0;
        }

        // Keys
        Message::StartAddKey => {
            model.overlay = Some(Overlay::AddKey(String::new()));
        }
        Message::AddKeyInput(text) => {
            if matches!(model.overlay, Some(Overlay::AddKey(_))) {
                model.overlay = Some(Overlay::AddKey(text));
            }
        }
        Message::ConfirmAddKey => {
            if let Some(Overlay::AddKey(name)) = model.overlay.clone() {
                match model.document.add_key(&name) {
                    Ok(()) => {
                        model.sync_editor_to_document();
                        model.editor = None;
                        model.focus = Focus::List;
                        model.overlay = None;
                        model.selected = model.document.len().saturating_sub(1);
                        model.preview_scroll = 0;
                        model.dirty = true;
                        model.show_toast(ToastLevel::Info, format!("Added \"{name}\""));
                    }
                    Err(err) => {
                        // The dialog stays open so the name can be fixed.
                        model.show_toast(ToastLevel::Warning, err.to_string());
                    }
                }
            }
        }
        Message::CancelAddKey => {
            if matches!(model.overlay, Some(Overlay::AddKey(_))) {
                model.overlay = None;
            }
        }
        Message::RequestDelete(key) => {
            if model.document.contains_key(&key) {
                model.overlay = Some(Overlay::ConfirmDelete(key));
            }
        }
        Message::ConfirmDelete => {
            if let Some(Overlay::ConfirmDelete(key)) = model.overlay.take() {
                model.sync_editor_to_document();
                if model.editor_for(&key).is_some() {
                    model.editor = None;
                    model.pending_selection = None;
                    model.focus = Focus::List;
                }
                if model.document.remove_key(&key).is_some() {
                    model.forget_copy_flashes(&key);
                    model.clamp_selected();
                    model.preview_scroll = 0;
                    model.dirty = true;
                    model.show_toast(ToastLevel::Info, format!("Deleted \"{key}\""));
                }
            }
        }
        Message::CancelDelete => {
            if matches!(model.overlay, Some(Overlay::ConfirmDelete(_))) {
                model.overlay = None;
            }
        }

        // Files
        Message::StartSave => {
            model.sync_editor_to_document();
            let suggested = model.suggested_save_path();
            if model.direct_save {
                model.pending_save = Some(suggested);
            } else {
                model.overlay = Some(Overlay::SaveAs(suggested.display().to_string()));
            }
        }
        Message::SavePathInput(text) => {
            if matches!(model.overlay, Some(Overlay::SaveAs(_))) {
                model.overlay = Some(Overlay::SaveAs(text));
            }
        }
        Message::ConfirmSave => {
            if let Some(Overlay::SaveAs(path)) = model.overlay.clone() {
                if path.trim().is_empty() {
                    model.show_toast(ToastLevel::Warning, "Please enter a file name");
                } else {
                    model.pending_save = Some(PathBuf::from(path.trim()));
                    model.overlay = None;
                }
            }
        }
        Message::CancelSave => {
            if matches!(model.overlay, Some(Overlay::SaveAs(_))) {
                model.overlay = None;
            }
        }
        Message::StartOpen => {
            let initial = model
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            model.overlay = Some(Overlay::Open(initial));
        }
        Message::OpenPathInput(text) => {
            if matches!(model.overlay, Some(Overlay::Open(_))) {
                model.overlay = Some(Overlay::Open(text));
            }
        }
        Message::ConfirmOpen => {
            if let Some(Overlay::Open(path)) = model.overlay.clone() {
                if path.trim().is_empty() {
                    model.show_toast(ToastLevel::Warning, "Please enter a file path");
                } else {
                    model.pending_open = Some(PathBuf::from(path.trim()));
                    model.overlay = None;
                }
            }
        }
        Message::CancelOpen => {
            if matches!(model.overlay, Some(Overlay::Open(_))) {
                model.overlay = None;
            }
        }

        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.preview_scroll = model.preview_scroll.min(model.max_preview_scroll());
            model.editor_ensure_cursor_visible();
        }

        // Application
        Message::Quit => {
            model.sync_editor_to_document();
            if model.dirty && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

fn select(model: &mut Model, index: usize) {
    if model.document.is_empty() {
        return;
    }
    let index = index.min(model.document.len() - 1);
    if index != model.selected {
        // The editor only ever shows the highlighted entry.
        model.sync_editor_to_document();
        model.editor = None;
        model.pending_selection = None;
        model.focus = Focus::List;
        model.selected = index;
        model.preview_scroll = 0;
    }
}

/// Apply an editor operation, then copy any text change into the document.
fn edit(model: &mut Model, op: impl FnOnce(&mut EditorBuffer)) {
    let Some(editor) = model.editor.as_mut() else {
        return;
    };
    op(&mut editor.buffer);
    model.sync_editor_to_document();
    model.editor_ensure_cursor_visible();
}

fn insert_token(model: &mut Model, key: String, token: MarkdownToken) {
    let Some(editor) = model.editor.as_mut().filter(|editor| editor.key == key) else {
        tracing::debug!(key = %key, ?token, "token ignored, no editor attached");
        return;
    };
    let (prefix, suffix) = token.pair();
    let Some(insertion) = editor.buffer.apply_token(prefix, suffix) else {
        return;
    };
    model.sync_editor_to_document();
    model.pending_selection = Some(PendingSelection {
        key,
        start: insertion.start,
        end: insertion.end,
    });
}
