//! Prompt value editing.
//!
//! Provides a rope-backed text buffer with cursor and selection management,
//! and the markdown token inserter used by the editor toolbar.

mod buffer;
mod insert;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use insert::{Insertion, MarkdownToken, insert};
