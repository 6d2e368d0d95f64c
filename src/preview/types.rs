//! Rendered preview types.

/// A prompt value rendered for the preview pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    lines: Vec<PreviewLine>,
}

impl Preview {
    pub(crate) const fn from_lines(lines: Vec<PreviewLine>) -> Self {
        Self { lines }
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[PreviewLine] {
        &self.lines
    }

    /// Lines in `offset..offset + count`, clamped to the preview.
    pub fn visible_lines(&self, offset: usize, count: usize) -> &[PreviewLine] {
        let start = offset.min(self.lines.len());
        let end = offset.saturating_add(count).min(self.lines.len());
        &self.lines[start..end]
    }
}

/// A single rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl PreviewLine {
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    pub fn with_spans(line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        let content = spans.iter().map(InlineSpan::text).collect();
        Self {
            content,
            line_type,
            spans,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled inline span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-6)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting level
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Shown when the prompt is empty
    Placeholder,
    /// Empty line
    Empty,
}
