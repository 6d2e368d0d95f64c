//! Terminal UI components.
//!
//! - [`render`]: Draws the entry list, editor, preview and footer bars
//! - [`style`]: Theming and colors
//!
//! Layout helpers are public so input handling can map mouse positions to
//! the same panes the renderer draws.

pub mod style;

mod overlays;
mod render;
mod status;

pub use render::{
    PaneLayout, editor_text_height, list_row_at, list_scroll_start, pane_layout,
    preview_content_height, preview_content_width, render,
};

pub const LIST_WIDTH_PERCENT: u16 = 25;
pub const PREVIEW_LEFT_PADDING: u16 = 1;
