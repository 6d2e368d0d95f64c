//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Clipboard writes, file reads and file writes run in a separate effect
//! phase after each `update`, which also restores the editor selection left
//! pending by a token insertion.

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{
    COPY_FLASH_DURATION, CopyFlash, EditorState, Focus, Model, Overlay, PendingSelection,
    ToastLevel,
};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::prompts::PromptDocument;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    direct_save: bool,
    preview_visible: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application, optionally opening a prompt file.
    pub const fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            output_dir: None,
            direct_save: false,
            preview_visible: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Directory offered for saves.
    #[must_use]
    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// Save to the suggested path without showing the save dialog.
    #[must_use]
    pub const fn with_direct_save(mut self, enabled: bool) -> Self {
        self.direct_save = enabled;
        self
    }

    /// Set initial preview pane visibility.
    #[must_use]
    pub const fn with_preview_visible(mut self, visible: bool) -> Self {
        self.preview_visible = visible;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    /// Build the starting model, loading the prompt file if one was given.
    ///
    /// A file that fails to load leaves an empty document and an error toast.
    pub fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(PromptDocument::new(), None, terminal_size);
        model.output_dir.clone_from(&self.output_dir);
        model.direct_save = self.direct_save;
        model.preview_visible = self.preview_visible;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        if let Some(path) = &self.file_path {
            match PromptDocument::load(path) {
                Ok(document) => model.replace_document(document, path.clone()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "initial load failed");
                    model.show_toast(ToastLevel::Error, err.to_string());
                }
            }
        }
        model
    }
}
