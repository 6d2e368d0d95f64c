//! Markdown rendering with comrak.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue};
use comrak::{Arena, Options, parse_document};
use unicode_width::UnicodeWidthStr;

use super::types::{InlineSpan, InlineStyle, LineType, Preview, PreviewLine};

/// Text shown in place of an empty prompt.
pub const EMPTY_PLACEHOLDER: &str = "Nothing to preview";

const MIN_WRAP_WIDTH: usize = 10;

/// Render markdown `source` wrapped to `width` columns.
///
/// # Example
///
/// ```
/// use prompt_writer::preview::{LineType, render};
///
/// let preview = render("# Title\n\nSome *text*.", 40);
/// assert_eq!(preview.lines()[0].line_type(), &LineType::Heading(1));
/// ```
pub fn render(source: &str, width: u16) -> Preview {
    if source.trim().is_empty() {
        return Preview::from_lines(vec![PreviewLine::new(
            EMPTY_PLACEHOLDER.to_string(),
            LineType::Placeholder,
        )]);
    }

    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let mut renderer = Renderer::new(usize::from(width).max(MIN_WRAP_WIDTH));
    renderer.block(root, 0);
    Preview::from_lines(renderer.finish())
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM features that show up in prompt text
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

struct Renderer {
    lines: Vec<PreviewLine>,
    width: usize,
}

impl Renderer {
    const fn new(width: usize) -> Self {
        Self {
            lines: Vec::new(),
            width,
        }
    }

    fn finish(mut self) -> Vec<PreviewLine> {
        while self
            .lines
            .last()
            .is_some_and(|l| *l.line_type() == LineType::Empty)
        {
            self.lines.pop();
        }
        self.lines
    }

    fn blank(&mut self) {
        self.lines
            .push(PreviewLine::new(String::new(), LineType::Empty));
    }

    fn block<'a>(&mut self, node: &'a AstNode<'a>, depth: usize) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                if self
                    .lines
                    .last()
                    .is_some_and(|l| *l.line_type() != LineType::Empty)
                {
                    self.blank();
                }
                let prefix = "#".repeat(usize::from(heading.level));
                self.lines.push(PreviewLine::new(
                    format!("{prefix} {}", extract_text(node)),
                    LineType::Heading(heading.level),
                ));
                self.blank();
            }

            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node);
                for line_spans in wrap_spans(&spans, self.width, "", "") {
                    self.lines
                        .push(PreviewLine::with_spans(LineType::Paragraph, line_spans));
                }
                self.blank();
            }

            NodeValue::CodeBlock(code_block) => {
                let language = code_block.info.split_whitespace().next().unwrap_or("code");
                let inner = self.width.saturating_sub(2).max(1);
                self.lines.push(PreviewLine::new(
                    truncate(&format!("┌─ {language} "), self.width),
                    LineType::CodeBlock,
                ));
                for raw_line in code_block.literal.lines() {
                    self.lines.push(PreviewLine::new(
                        format!("│ {}", truncate(raw_line, inner)),
                        LineType::CodeBlock,
                    ));
                }
                self.lines
                    .push(PreviewLine::new("└─".to_string(), LineType::CodeBlock));
                self.blank();
            }

            NodeValue::HtmlBlock(html) => {
                for raw_line in html.literal.lines() {
                    self.lines.push(PreviewLine::new(
                        truncate(raw_line, self.width),
                        LineType::Paragraph,
                    ));
                }
                self.blank();
            }

            NodeValue::List(list) => {
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => format!("{}{delimiter} ", list.start + index),
                    };
                    self.item(child, depth + 1, &marker);
                }
                if depth == 0 {
                    self.blank();
                }
            }

            NodeValue::Item(_) | NodeValue::TaskItem(_) => {
                self.item(node, depth.max(1), "• ");
            }

            NodeValue::BlockQuote => {
                let mut inner = Self::new(self.width.saturating_sub(2).max(MIN_WRAP_WIDTH));
                for child in node.children() {
                    inner.block(child, depth);
                }
                for line in inner.finish() {
                    let mut spans = vec![InlineSpan::new("│ ".to_string(), InlineStyle::default())];
                    match line.spans() {
                        Some(existing) => spans.extend(existing.iter().cloned()),
                        None => spans.push(InlineSpan::new(
                            line.content().to_string(),
                            InlineStyle::default(),
                        )),
                    }
                    self.lines
                        .push(PreviewLine::with_spans(LineType::BlockQuote, spans));
                }
                self.blank();
            }

            NodeValue::ThematicBreak => {
                self.lines.push(PreviewLine::new(
                    "─".repeat(self.width.min(40)),
                    LineType::HorizontalRule,
                ));
                self.blank();
            }

            NodeValue::Table(_) => {
                for row in render_table(node, self.width) {
                    self.lines.push(PreviewLine::new(row, LineType::Table));
                }
                self.blank();
            }

            _ => {
                for child in node.children() {
                    self.block(child, depth);
                }
            }
        }
    }

    fn item<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, list_marker: &str) {
        let marker = match &node.data.borrow().value {
            NodeValue::TaskItem(Some(_)) => "✓ ",
            NodeValue::TaskItem(None) => "□ ",
            _ => list_marker,
        };
        let indent = "  ".repeat(depth.saturating_sub(1));
        let prefix_first = format!("{indent}{marker}");
        let prefix_next = format!("{indent}{}", " ".repeat(marker.width()));
        let mut rendered_any = false;

        for child in node.children() {
            let is_paragraph = matches!(child.data.borrow().value, NodeValue::Paragraph);
            let is_list = matches!(child.data.borrow().value, NodeValue::List(_));
            if is_paragraph {
                let spans = collect_inline_spans(child);
                let first = if rendered_any {
                    &prefix_next
                } else {
                    &prefix_first
                };
                for line_spans in wrap_spans(&spans, self.width, first, &prefix_next) {
                    self.lines
                        .push(PreviewLine::with_spans(LineType::ListItem(depth), line_spans));
                }
                rendered_any = true;
            } else if is_list {
                self.block(child, depth);
            } else {
                self.block(child, depth);
                rendered_any = true;
            }
        }

        if !rendered_any {
            self.lines
                .push(PreviewLine::new(prefix_first, LineType::ListItem(depth)));
        }
    }
}

fn render_table<'a>(table: &'a AstNode<'a>, width: usize) -> Vec<String> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut has_header = false;
    for row in table.children() {
        if let NodeValue::TableRow(header) = row.data.borrow().value {
            has_header |= header && rows.is_empty();
            rows.push(row.children().map(extract_text).collect());
        }
    }
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut out = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let cells: Vec<String> = (0..columns)
            .map(|i| {
                let cell = row.get(i).map_or("", String::as_str);
                format!(" {cell}{} ", " ".repeat(widths[i].saturating_sub(cell.width())))
            })
            .collect();
        out.push(truncate(&cells.join("│"), width));
        if row_idx == 0 && has_header {
            let rule: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            out.push(truncate(&rule.join("┼"), width));
        }
    }
    out
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    extract_text_recursive(node, &mut text);
    text
}

fn extract_text_recursive<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => text.push_str(t),
        NodeValue::Code(code) => text.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                extract_text_recursive(child, text);
            }
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::HtmlInline(html) => spans.push(InlineSpan::new(html.clone(), style)),
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) => {
            let next = InlineStyle { link: true, ..style };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new(" ".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_inline_spans_recursive(child, style, spans);
            }
        }
    }
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_line = |prefix: &str, current: &mut Vec<InlineSpan>, current_len: &mut usize| {
        current.clear();
        *current_len = prefix.width();
        if !prefix.is_empty() {
            current.push(InlineSpan::new(prefix.to_string(), InlineStyle::default()));
        }
    };

    start_line(prefix_first, &mut current, &mut current_len);

    for token in tokens {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            trim_trailing_whitespace(&mut current);
            lines.push(std::mem::take(&mut current));
            start_line(prefix_next, &mut current, &mut current_len);
            has_word = false;
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at wrapped line starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    if has_word {
        trim_trailing_whitespace(&mut current);
    }
    lines.push(current);
    lines
}

/// Drop whitespace-only spans left at the end of a wrapped line.
fn trim_trailing_whitespace(line: &mut Vec<InlineSpan>) {
    while line
        .last()
        .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        line.pop();
    }
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }
    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(preview: &Preview) -> Vec<String> {
        preview
            .lines()
            .iter()
            .map(|l| l.content().to_string())
            .collect()
    }

    #[test]
    fn test_empty_source_renders_placeholder() {
        let preview = render("  \n", 40);
        assert_eq!(preview.line_count(), 1);
        assert_eq!(preview.lines()[0].line_type(), &LineType::Placeholder);
        assert_eq!(preview.lines()[0].content(), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_heading_levels() {
        let preview = render("# One\n\n## Two\n\n### Three", 40);
        let headings: Vec<_> = preview
            .lines()
            .iter()
            .filter_map(|l| match l.line_type() {
                LineType::Heading(level) => Some((*level, l.content().to_string())),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                (1, "# One".to_string()),
                (2, "## Two".to_string()),
                (3, "### Three".to_string())
            ]
        );
    }

    #[test]
    fn test_inline_styles_are_tracked() {
        let preview = render("**bold** *it* `code` [link](http://x) ~~gone~~", 80);
        let spans = preview.lines()[0].spans().unwrap();
        let style_of = |text: &str| {
            spans
                .iter()
                .find(|s| s.text() == text)
                .map(InlineSpan::style)
                .unwrap()
        };
        assert!(style_of("bold").strong);
        assert!(style_of("it").emphasis);
        assert!(style_of("code").code);
        assert!(style_of("link").link);
        assert!(style_of("gone").strikethrough);
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let preview = render("alpha beta gamma delta epsilon", 12);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["alpha beta", "gamma delta", "epsilon"]);
    }

    #[test]
    fn test_wrapped_lines_have_no_trailing_space() {
        let preview = render("see [the docs](https://x.y) and ~~old words~~ here", 10);
        for line in preview.lines() {
            assert_eq!(line.content(), line.content().trim_end(), "{line:?}");
            if let Some(last) = line.spans().and_then(<[InlineSpan]>::last) {
                assert!(!last.text().ends_with(' '), "{line:?}");
            }
        }
    }

    #[test]
    fn test_bullet_and_ordered_lists() {
        let preview = render("- one\n- two\n\n1. first\n2. second", 40);
        let lines = contents(&preview);
        assert!(lines.contains(&"• one".to_string()));
        assert!(lines.contains(&"• two".to_string()));
        assert!(lines.contains(&"1. first".to_string()));
        assert!(lines.contains(&"2. second".to_string()));
    }

    #[test]
    fn test_nested_list_is_indented() {
        let preview = render("- outer\n  - inner", 40);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["• outer", "  • inner"]);
        assert_eq!(preview.lines()[1].line_type(), &LineType::ListItem(2));
    }

    #[test]
    fn test_task_list_markers() {
        let preview = render("- [x] done\n- [ ] todo", 40);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["✓ done", "□ todo"]);
    }

    #[test]
    fn test_code_block_is_framed() {
        let preview = render("```rust\nfn main() {}\n```", 40);
        let lines = contents(&preview);
        assert_eq!(lines, vec!["┌─ rust ", "│ fn main() {}", "└─"]);
        assert!(
            preview
                .lines()
                .iter()
                .all(|l| *l.line_type() == LineType::CodeBlock)
        );
    }

    #[test]
    fn test_block_quote_prefix() {
        let preview = render("> quoted text", 40);
        assert_eq!(contents(&preview), vec!["│ quoted text"]);
        assert_eq!(preview.lines()[0].line_type(), &LineType::BlockQuote);
    }

    #[test]
    fn test_table_has_header_rule() {
        let preview = render("| a | bb |\n|---|----|\n| 1 | 2 |", 40);
        let lines = contents(&preview);
        assert_eq!(lines[0], " a │ bb ");
        assert_eq!(lines[1], "───┼────");
        assert_eq!(lines[2], " 1 │ 2  ");
    }

    #[test]
    fn test_visible_lines_clamps() {
        let preview = render("a\n\nb\n\nc", 40);
        assert_eq!(preview.line_count(), 5);
        assert_eq!(preview.visible_lines(3, 10).len(), 2);
        assert!(preview.visible_lines(10, 3).is_empty());
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
