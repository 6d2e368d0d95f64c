//! Live markdown preview of the prompt being edited.

mod parser;
mod types;

pub use parser::{EMPTY_PLACEHOLDER, render};
pub use types::{InlineSpan, InlineStyle, LineType, Preview, PreviewLine};
