// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. prompts::PromptDocument)
    clippy::module_name_repetitions
)]

//! # prompt-writer
//!
//! A terminal editor for collections of LLM prompts stored as a flat JSON
//! object of string values.
//!
//! prompt-writer offers:
//! - An ordered list of prompt keys with add and delete
//! - A text editor with a markdown toolbar that wraps the selection
//! - A live markdown preview of the highlighted prompt
//! - Copying a prompt as a JSON-safe string or as formatted text
//! - Saving to a timestamped file name
//!
//! ## Architecture
//!
//! prompt-writer uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`prompts`]: The prompt document and its JSON format
//! - [`editor`]: Text buffer and markdown token insertion
//! - [`preview`]: Markdown rendering for the preview pane
//! - [`export`]: Timestamped saving and JSON-safe text
//! - [`clipboard`]: System clipboard access
//! - [`config`]: Persistent command-line defaults
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod preview;
pub mod prompts;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::error::PromptError;
    pub use crate::prompts::PromptDocument;
}
