use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model.file_name().unwrap_or_else(|| "untitled".to_string());
    let dirty_indicator = if model.dirty { " [modified]" } else { "" };

    let (mode, hints) = match model.focus {
        Focus::List => ("LIST", "Enter:edit  a:add  d:delete  c/C:copy  Ctrl+S:save"),
        Focus::Editor => ("EDIT", "Esc:list  Ctrl+J/Ctrl+Y:copy  Ctrl+S:save"),
    };
    let cursor_info = model.editor.as_ref().map_or_else(String::new, |editor| {
        let c = editor.buffer.cursor();
        format!("  Ln {}, Col {}", c.line + 1, c.col + 1)
    });

    let status = format!(
        " {mode}  {filename}{dirty_indicator}  {} prompts{cursor_info}  {hints}  F1:help",
        model.document.len()
    );

    let bar_style = match model.focus {
        Focus::List => Style::default().bg(Color::DarkGray).fg(Color::White),
        Focus::Editor => Style::default().bg(Color::Magenta).fg(Color::White),
    };
    frame.render_widget(Paragraph::new(status).style(bar_style), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
