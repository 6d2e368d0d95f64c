use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::clipboard::CopyMode;
use crate::editor::EditorBuffer;
use crate::export;
use crate::preview::{self, Preview};
use crate::prompts::PromptDocument;

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// How long the "Copied" confirmation stays next to a prompt.
pub const COPY_FLASH_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives key input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Editor,
}

/// The editor attached to one prompt.
pub struct EditorState {
    /// Key of the prompt being edited.
    pub key: String,
    pub buffer: EditorBuffer,
    /// Line index of the first visible editor line.
    pub scroll_offset: usize,
}

/// A selection to restore once a token insertion has been stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub key: String,
    pub start: usize,
    pub end: usize,
}

/// Visible confirmation of a clipboard copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyFlash {
    pub expires_at: Instant,
}

/// A modal dialog with its current input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// New key name being typed.
    AddKey(String),
    /// Waiting for y/n before deleting the key.
    ConfirmDelete(String),
    /// Destination path for saving.
    SaveAs(String),
    /// Path of a prompt file to open.
    Open(String),
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The prompt collection being edited
    pub document: PromptDocument,
    /// File the document was loaded from or last saved to
    pub file_path: Option<PathBuf>,
    /// Directory offered for saves
    pub output_dir: Option<PathBuf>,
    /// Save straight to the suggested path without asking
    pub direct_save: bool,
    /// Index of the highlighted entry
    pub selected: usize,
    pub focus: Focus,
    /// Editor attached to the selected prompt (editor focus only)
    pub editor: Option<EditorState>,
    /// Caret restoration waiting for the effect phase
    pub pending_selection: Option<PendingSelection>,
    copy_flashes: HashMap<(String, CopyMode), CopyFlash>,
    /// Active modal dialog
    pub overlay: Option<Overlay>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the preview pane is shown
    pub preview_visible: bool,
    /// First visible line of the preview
    pub preview_scroll: usize,
    /// Unsaved changes since the last load or save
    pub dirty: bool,
    /// Terminal size (width, height)
    pub terminal_size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    toast: Option<Toast>,
    /// Save destination accepted by the user, written in the effect phase
    pub(super) pending_save: Option<PathBuf>,
    /// File chosen in the open dialog, read in the effect phase
    pub(super) pending_open: Option<PathBuf>,
    /// Set after first quit attempt with unsaved changes; allows second quit to proceed
    pub quit_confirmed: bool,
    /// Whether the app should quit
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("entries", &self.document.len())
            .field("selected", &self.selected)
            .field("focus", &self.focus)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model for `document`, loaded from `file_path` if known.
    pub fn new(
        document: PromptDocument,
        file_path: Option<PathBuf>,
        terminal_size: (u16, u16),
    ) -> Self {
        Self {
            document,
            file_path,
            terminal_size,
            ..Self::default()
        }
    }

    /// Key of the highlighted entry.
    pub fn selected_key(&self) -> Option<&str> {
        self.document.key_at(self.selected)
    }

    /// Text of the highlighted entry.
    pub fn selected_value(&self) -> Option<&str> {
        self.selected_key().and_then(|key| self.document.get(key))
    }

    /// The attached editor, if it belongs to `key`.
    pub fn editor_for(&self, key: &str) -> Option<&EditorState> {
        self.editor.as_ref().filter(|editor| editor.key == key)
    }

    /// Display name of the current file.
    pub fn file_name(&self) -> Option<String> {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
    }

    /// Where a save would go if the user accepted the suggestion.
    pub fn suggested_save_path(&self) -> PathBuf {
        let name = export::suggested_file_name(self.file_name().as_deref());
        let dir = self
            .output_dir
            .clone()
            .or_else(|| {
                self.file_path
                    .as_deref()
                    .and_then(Path::parent)
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
            })
            .unwrap_or_default();
        dir.join(name)
    }

    /// Swap in a freshly loaded document.
    pub fn replace_document(&mut self, document: PromptDocument, path: PathBuf) {
        self.document = document;
        self.file_path = Some(path);
        self.selected = 0;
        self.focus = Focus::List;
        self.editor = None;
        self.pending_selection = None;
        self.copy_flashes.clear();
        self.preview_scroll = 0;
        self.dirty = false;
    }

    /// Keep the selection inside the document after removals.
    pub(super) fn clamp_selected(&mut self) {
        self.selected = self.selected.min(self.document.len().saturating_sub(1));
    }

    /// Copy the attached editor's text into the document.
    pub(super) fn sync_editor_to_document(&mut self) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        if !editor.buffer.is_dirty() {
            return;
        }
        self.document.set_value(&editor.key, editor.buffer.text());
        editor.buffer.mark_clean();
        self.dirty = true;
    }

    /// Keep the editor cursor line inside the editor viewport.
    pub(super) fn editor_ensure_cursor_visible(&mut self) {
        let visible_height = self.editor_visible_height();
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let cursor_line = editor.buffer.cursor().line;
        if visible_height == 0 {
            editor.scroll_offset = cursor_line;
            return;
        }
        if cursor_line < editor.scroll_offset {
            editor.scroll_offset = cursor_line;
        } else if cursor_line >= editor.scroll_offset + visible_height {
            editor.scroll_offset = cursor_line + 1 - visible_height;
        }
    }

    fn layout(&self) -> crate::ui::PaneLayout {
        let (width, height) = self.terminal_size;
        let area = ratatui::layout::Rect::new(0, 0, width, height);
        crate::ui::pane_layout(area, self.preview_visible, self.active_toast().is_some())
    }

    fn editor_visible_height(&self) -> usize {
        usize::from(crate::ui::editor_text_height(self.layout().editor))
    }

    /// The highlighted prompt rendered at the preview pane's width.
    pub fn preview(&self) -> Preview {
        let width = self
            .layout()
            .preview
            .map_or(self.terminal_size.0, crate::ui::preview_content_width);
        preview::render(self.selected_value().unwrap_or_default(), width)
    }

    pub(super) fn preview_page_height(&self) -> usize {
        self.layout()
            .preview
            .map_or(0, |area| usize::from(crate::ui::preview_content_height(area)))
    }

    pub(super) fn max_preview_scroll(&self) -> usize {
        self.preview()
            .line_count()
            .saturating_sub(self.preview_page_height().max(1))
    }

    /// Record a successful copy of `key` in `mode`.
    pub fn flash_copy(&mut self, key: &str, mode: CopyMode, now: Instant) {
        self.copy_flashes.insert(
            (key.to_string(), mode),
            CopyFlash {
                expires_at: now + COPY_FLASH_DURATION,
            },
        );
    }

    /// Whether the copy confirmation for `key` in `mode` is still showing.
    pub fn copy_flash_active(&self, key: &str, mode: CopyMode, now: Instant) -> bool {
        self.copy_flashes
            .get(&(key.to_string(), mode))
            .is_some_and(|flash| flash.expires_at > now)
    }

    /// Drop expired copy confirmations. Returns `true` if any were removed.
    pub fn expire_copy_flashes(&mut self, now: Instant) -> bool {
        let before = self.copy_flashes.len();
        self.copy_flashes.retain(|_, flash| flash.expires_at > now);
        self.copy_flashes.len() != before
    }

    pub(super) fn forget_copy_flashes(&mut self, key: &str) {
        self.copy_flashes.retain(|(k, _), _| k != key);
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            document: PromptDocument::new(),
            file_path: None,
            output_dir: None,
            direct_save: false,
            selected: 0,
            focus: Focus::List,
            editor: None,
            pending_selection: None,
            copy_flashes: HashMap::new(),
            overlay: None,
            help_visible: false,
            preview_visible: true,
            preview_scroll: 0,
            dirty: false,
            terminal_size: (80, 24),
            config_global_path: None,
            config_local_path: None,
            toast: None,
            pending_save: None,
            pending_open: None,
            quit_confirmed: false,
            should_quit: false,
        }
    }
}
