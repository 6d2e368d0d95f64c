use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{Model, Overlay};
use crate::editor::MarkdownToken;

fn dialog_rect(area: Rect) -> Rect {
    let popup_width = area.width.saturating_sub(16).clamp(20, 72);
    centered_popup_rect(popup_width, 7, area)
}

pub fn render_dialog(overlay: &Overlay, frame: &mut Frame, area: Rect) {
    let popup = dialog_rect(area);
    let dim_style = Style::default().fg(Color::Indexed(245));
    let input_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let (title, lines) = match overlay {
        Overlay::AddKey(text) => (
            "Add Key",
            vec![
                Line::raw("New key name:"),
                input_line(text, input_style),
                Line::styled("Enter add · Esc cancel", dim_style),
            ],
        ),
        Overlay::ConfirmDelete(key) => (
            "Delete Key",
            vec![
                Line::raw(format!("Are you sure you want to delete \"{key}\"?")),
                Line::raw(""),
                Line::styled("y/Enter delete · n/Esc cancel", dim_style),
            ],
        ),
        Overlay::SaveAs(text) => (
            "Save As",
            vec![
                Line::raw("Save to:"),
                input_line(text, input_style),
                Line::styled("Enter save · Ctrl+U clear · Esc cancel", dim_style),
            ],
        ),
        Overlay::Open(text) => (
            "Open JSON File",
            vec![
                Line::raw("Path:"),
                input_line(text, input_style),
                Line::styled("Enter open · Ctrl+U clear · Esc cancel", dim_style),
            ],
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn input_line(text: &str, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("> {text}"), style),
        Span::styled("_", style.add_modifier(Modifier::SLOW_BLINK)),
    ])
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Prompts", section_style));
    lines.push(binding_row(("j/k Up/Down", "Select prompt"), ("Enter / e", "Edit prompt")));
    lines.push(binding_row(("a / Ctrl+N", "Add key"), ("d / Delete", "Delete key")));
    lines.push(binding_row(("c / C", "Copy JSON / text"), ("?", "Toggle help")));

    lines.push(Line::styled("Editor", section_style));
    lines.push(binding_row(("Esc", "Back to list"), ("Shift+Arrows", "Select text")));
    lines.push(binding_row(("Ctrl+A", "Select all"), ("Ctrl+J / Y", "Copy JSON / text")));
    let tokens: Vec<String> = MarkdownToken::ALL
        .iter()
        .map(|t| format!("{} {}", t.shortcut(), t.label()))
        .collect();
    for chunk in tokens.chunks(6) {
        lines.push(Line::raw(format!("  {}", chunk.join("  "))));
    }

    lines.push(Line::styled("Files", section_style));
    lines.push(binding_row(("Ctrl+O", "Open JSON file"), ("Ctrl+S", "Save timestamped")));
    lines.push(binding_row(("PgUp/PgDn", "Scroll preview"), ("Alt+P", "Toggle preview")));
    lines.push(binding_row(("Ctrl+Q", "Quit (twice if unsaved)"), ("", "")));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help (any key closes)")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Two key bindings side by side, each padded to a fixed column.
fn binding_row(left: (&str, &str), right: (&str, &str)) -> Line<'static> {
    let text = format!("  {:<13}{:<18}{:<13}{}", left.0, left.1, right.0, right.1);
    Line::raw(text.trim_end().to_string())
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
