use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};
use crate::clipboard::CopyMode;
use crate::editor::{EditorBuffer, MarkdownToken};

use super::{LIST_WIDTH_PERCENT, PREVIEW_LEFT_PADDING, overlays, status, style};

/// Screen areas of the main panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub list: Rect,
    pub editor: Rect,
    pub preview: Option<Rect>,
    pub toast: Option<Rect>,
    pub status: Rect,
}

/// Split the terminal into list, editor, preview and footer rows.
pub fn pane_layout(area: Rect, preview_visible: bool, toast_active: bool) -> PaneLayout {
    let footer_rows = 1 + u16::from(toast_active);
    let main = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    let toast = toast_active.then(|| Rect {
        y: area.y + area.height.saturating_sub(2),
        height: area.height.saturating_sub(1).min(1),
        ..area
    });

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LIST_WIDTH_PERCENT),
            Constraint::Percentage(100 - LIST_WIDTH_PERCENT),
        ])
        .split(main);
    let (editor, preview) = if preview_visible {
        let right = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        (right[0], Some(right[1]))
    } else {
        (columns[1], None)
    };

    PaneLayout {
        list: columns[0],
        editor,
        preview,
        toast,
        status,
    }
}

/// Rows available for prompt text inside the editor pane.
pub const fn editor_text_height(editor: Rect) -> u16 {
    // borders plus the toolbar row
    editor.height.saturating_sub(3)
}

/// Columns available for rendered markdown inside the preview pane.
pub const fn preview_content_width(preview: Rect) -> u16 {
    let width = preview.width.saturating_sub(2 + PREVIEW_LEFT_PADDING);
    if width == 0 { 1 } else { width }
}

/// Rows available for rendered markdown inside the preview pane.
pub const fn preview_content_height(preview: Rect) -> u16 {
    // borders plus the copy button row
    preview.height.saturating_sub(3)
}

/// Index of the first entry shown in the list pane.
pub fn list_scroll_start(list: Rect, selected: usize) -> usize {
    let visible = usize::from(list.height.saturating_sub(2)).max(1);
    selected.saturating_sub(visible - 1)
}

/// List row (relative to the first entry row) under screen row `row`.
pub fn list_row_at(list: Rect, row: u16) -> Option<usize> {
    let first = list.y + 1;
    let last = list.y + list.height.saturating_sub(1);
    (row >= first && row < last).then(|| usize::from(row - first))
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let layout = pane_layout(area, model.preview_visible, model.active_toast().is_some());

    render_list(model, frame, layout.list);
    render_editor(model, frame, layout.editor);
    if let Some(preview_area) = layout.preview {
        render_preview(model, frame, preview_area);
    }

    if let Some(toast_area) = layout.toast {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, layout.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if let Some(overlay) = &model.overlay {
        overlays::render_dialog(overlay, frame, area);
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
}

fn render_list(model: &Model, frame: &mut Frame, area: Rect) {
    let block = pane_block(
        format!("Prompts ({})", model.document.len()),
        model.focus == Focus::List,
    );

    if model.document.is_empty() {
        let hint = if model.file_path.is_none() {
            "Open a JSON file to get started (Ctrl+O)"
        } else {
            "No prompts yet. Press a to add one"
        };
        let placeholder = Paragraph::new(hint)
            .style(style::placeholder_style())
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let visible_rows = usize::from(area.height.saturating_sub(2));
    let start = list_scroll_start(area, model.selected);
    let items: Vec<Line> = model
        .document
        .keys()
        .enumerate()
        .skip(start)
        .take(visible_rows)
        .map(|(i, key)| {
            let is_selected = i == model.selected;
            let marker = if is_selected { ">" } else { " " };
            let line_style = if is_selected {
                style::selected_entry_style(model.focus == Focus::List)
            } else {
                Style::default()
            };
            Line::styled(format!("{marker} {key}"), line_style)
        })
        .collect();

    frame.render_widget(Paragraph::new(items).block(block), area);
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let key = model.selected_key();
    let attached = key.and_then(|k| model.editor_for(k));
    let title = key.map_or_else(|| "Editor".to_string(), |k| format!("Edit: {k}"));
    let block = pane_block(title, model.focus == Focus::Editor);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let Some(key) = key else {
        return;
    };
    if inner.height == 0 {
        return;
    }

    let toolbar_area = Rect { height: 1, ..inner };
    let text_area = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };
    frame.render_widget(
        Paragraph::new(toolbar_line(attached.is_some())),
        toolbar_area,
    );

    let content = match attached {
        Some(editor) => editor_lines(
            &editor.buffer,
            editor.scroll_offset,
            text_area.height,
            text_area.width,
        ),
        None => model
            .document
            .get(key)
            .unwrap_or_default()
            .lines()
            .take(usize::from(text_area.height))
            .map(|line| Line::raw(line.to_string()))
            .collect(),
    };
    frame.render_widget(Paragraph::new(content), text_area);
}

fn toolbar_line(active: bool) -> Line<'static> {
    let label_style = style::toolbar_label_style(active);
    let key_style = style::toolbar_key_style();
    let mut spans = Vec::new();
    for (i, token) in MarkdownToken::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", key_style));
        }
        spans.push(Span::styled(token.label(), label_style));
        spans.push(Span::styled(format!(" {}", token.shortcut()), key_style));
    }
    Line::from(spans)
}

/// Render buffer lines with the cursor and selection highlighted.
///
/// Lines are not wrapped; the view shifts horizontally so the cursor column
/// stays visible.
fn editor_lines(
    buf: &EditorBuffer,
    scroll_offset: usize,
    height: u16,
    width: u16,
) -> Vec<Line<'static>> {
    let cursor = buf.cursor();
    let cursor_offset = buf.cursor_offset();
    let (sel_start, sel_end) = buf.selection_offsets();
    let cursor_line = buf.line_at(cursor.line).unwrap_or_default();
    let cursor_col: usize = cursor_line
        .chars()
        .take(cursor.col)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    let h_offset = cursor_col.saturating_sub(usize::from(width.saturating_sub(1)));

    let total_lines = buf.line_count();
    let end = (scroll_offset + usize::from(height)).min(total_lines);
    let mut content = Vec::new();
    for line_idx in scroll_offset..end {
        let text = buf.line_at(line_idx).unwrap_or_default();
        let range = buf.line_char_range(line_idx);
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut col = 0usize;
        let mut push = |s: String, st: Style| {
            if let Some(last) = spans.last_mut()
                && last.style == st
            {
                last.content.to_mut().push_str(&s);
            } else {
                spans.push(Span::styled(s, st));
            }
        };

        for (i, ch) in text.chars().enumerate() {
            let offset = range.start + i;
            let ch_width = ch.width().unwrap_or(0);
            let visible = col >= h_offset;
            col += ch_width;
            if !visible {
                continue;
            }
            let ch_style = if offset == cursor_offset {
                style::cursor_style()
            } else if offset >= sel_start && offset < sel_end {
                style::selection_style()
            } else {
                Style::default()
            };
            push(ch.to_string(), ch_style);
        }
        if line_idx == cursor.line && cursor_offset == range.end {
            push(" ".to_string(), style::cursor_style());
        }
        content.push(Line::from(spans));
    }
    content
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let block = pane_block("Preview".to_string(), false);
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let Some(key) = model.selected_key() else {
        return;
    };
    if inner.height == 0 {
        return;
    }

    let buttons_area = Rect { height: 1, ..inner };
    let content_area = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1),
        ..inner
    };

    let now = Instant::now();
    let mut buttons = Vec::new();
    for (mode, hint) in [(CopyMode::JsonSafe, "c"), (CopyMode::Formatted, "C")] {
        if !buttons.is_empty() {
            buttons.push(Span::raw("  "));
        }
        if model.copy_flash_active(key, mode, now) {
            buttons.push(Span::styled("✓ Copied!", style::copied_style()));
        } else {
            buttons.push(Span::styled(format!("[{hint}] "), style::toolbar_key_style()));
            buttons.push(Span::styled(mode.label(), style::toolbar_label_style(true)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(buttons)), buttons_area);

    let preview = model.preview();
    let height = usize::from(content_area.height);
    let max_start = preview.line_count().saturating_sub(height);
    let start = model.preview_scroll.min(max_start);
    let content: Vec<Line> = preview
        .visible_lines(start, height)
        .iter()
        .map(|line| {
            let line_style = style::style_for_line_type(line.line_type());
            match line.spans() {
                Some(spans) => Line::from(
                    spans
                        .iter()
                        .map(|span| {
                            Span::styled(
                                span.text().to_string(),
                                style::style_for_inline(line_style, span.style()),
                            )
                        })
                        .collect::<Vec<_>>(),
                ),
                None => Line::styled(line.content().to_string(), line_style),
            }
        })
        .collect();

    let doc = Paragraph::new(content).block(Block::default().padding(Padding::left(
        PREVIEW_LEFT_PADDING,
    )));
    frame.render_widget(doc, content_area);
}
