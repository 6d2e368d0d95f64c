use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::model::{Focus, Overlay};
use crate::app::{App, Message, Model};
use crate::editor::{Direction, MarkdownToken};

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(event: Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(key, model),
            Event::Mouse(mouse) => Self::handle_mouse(mouse, model),
            Event::Paste(text) if model.focus == Focus::Editor && model.overlay.is_none() => {
                Some(Message::EditorInsertStr(text.replace("\r\n", "\n")))
            }
            Event::Resize(w, h) => Some(Message::Resize(w, h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if let Some(overlay) = &model.overlay {
            return overlay_key(key, overlay);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => return Some(Message::Quit),
            KeyCode::Char('c') if ctrl => return Some(Message::Quit),
            KeyCode::Char('s') if ctrl => return Some(Message::StartSave),
            KeyCode::Char('o') if ctrl => return Some(Message::StartOpen),
            KeyCode::Char('n') if ctrl => return Some(Message::StartAddKey),
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::ALT) => {
                return Some(Message::TogglePreview);
            }
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::PageDown => {
                return Some(Message::PreviewScrollDown(preview_page(model)));
            }
            KeyCode::PageUp => return Some(Message::PreviewScrollUp(preview_page(model))),
            _ => {}
        }

        match model.focus {
            Focus::List => list_key(key, model),
            Focus::Editor => editor_key(key, model),
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.overlay.is_some() {
            return None;
        }
        let (width, height) = model.terminal_size;
        let panes = crate::ui::pane_layout(
            Rect::new(0, 0, width, height),
            model.preview_visible,
            model.active_toast().is_some(),
        );

        let over_preview = panes
            .preview
            .is_some_and(|area| point_in_rect(mouse.column, mouse.row, area));
        match mouse.kind {
            MouseEventKind::ScrollDown if over_preview => {
                Some(Message::PreviewScrollDown(WHEEL_LINES))
            }
            MouseEventKind::ScrollUp if over_preview => Some(Message::PreviewScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown
                if model.focus == Focus::List
                    && point_in_rect(mouse.column, mouse.row, panes.list) =>
            {
                Some(Message::SelectNext)
            }
            MouseEventKind::ScrollUp
                if model.focus == Focus::List
                    && point_in_rect(mouse.column, mouse.row, panes.list) =>
            {
                Some(Message::SelectPrev)
            }
            MouseEventKind::Up(MouseButton::Left)
                if model.focus == Focus::List
                    && point_in_rect(mouse.column, mouse.row, panes.list) =>
            {
                let row = crate::ui::list_row_at(panes.list, mouse.row)?;
                let start = crate::ui::list_scroll_start(panes.list, model.selected);
                let index = start + row;
                (index < model.document.len()).then_some(Message::SelectIndex(index))
            }
            MouseEventKind::Up(MouseButton::Left)
                if model.focus == Focus::List
                    && point_in_rect(mouse.column, mouse.row, panes.editor)
                    && !model.document.is_empty() =>
            {
                Some(Message::FocusEditor)
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn overlay_key(key: KeyEvent, overlay: &Overlay) -> Option<Message> {
    match overlay {
        Overlay::ConfirmDelete(_) => match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmDelete),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Message::CancelDelete),
            _ => None,
        },
        Overlay::AddKey(text) => text_input(
            key,
            text,
            Message::AddKeyInput,
            Message::ConfirmAddKey,
            Message::CancelAddKey,
        ),
        Overlay::SaveAs(text) => text_input(
            key,
            text,
            Message::SavePathInput,
            Message::ConfirmSave,
            Message::CancelSave,
        ),
        Overlay::Open(text) => text_input(
            key,
            text,
            Message::OpenPathInput,
            Message::ConfirmOpen,
            Message::CancelOpen,
        ),
    }
}

fn text_input(
    key: KeyEvent,
    current: &str,
    input: fn(String) -> Message,
    confirm: Message,
    cancel: Message,
) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(cancel),
        KeyCode::Enter => Some(confirm),
        KeyCode::Backspace => {
            let mut next = current.to_string();
            next.pop();
            Some(input(next))
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(input(String::new()))
        }
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            let mut next = current.to_string();
            next.push(c);
            Some(input(next))
        }
        _ => None,
    }
}

fn list_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let selected = model.selected_key().map(ToString::to_string);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectNext),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectPrev),
        KeyCode::Char('g') | KeyCode::Home => Some(Message::SelectIndex(0)),
        KeyCode::Char('G') | KeyCode::End => Some(Message::SelectIndex(
            model.document.len().saturating_sub(1),
        )),
        KeyCode::Enter | KeyCode::Char('e' | 'i') | KeyCode::Tab if selected.is_some() => {
            Some(Message::FocusEditor)
        }
        KeyCode::Char('a') => Some(Message::StartAddKey),
        KeyCode::Char('d') | KeyCode::Delete => selected.map(Message::RequestDelete),
        KeyCode::Char('c') => selected.map(Message::CopyJsonSafe),
        KeyCode::Char('C') => selected.map(Message::CopyFormatted),
        KeyCode::Char(' ') => Some(Message::PreviewScrollDown(preview_page(model))),
        KeyCode::Char('b') => Some(Message::PreviewScrollUp(preview_page(model))),
        KeyCode::Char('J') => Some(Message::PreviewScrollDown(1)),
        KeyCode::Char('K') => Some(Message::PreviewScrollUp(1)),
        KeyCode::Char('s') => Some(Message::StartSave),
        KeyCode::Char('o') => Some(Message::StartOpen),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        KeyCode::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn editor_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let editing = model.editor.as_ref()?.key.clone();
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if let Some(token) = token_for_key(key) {
        return Some(Message::InsertToken(editing, token));
    }

    match key.code {
        KeyCode::Esc => Some(Message::FocusList),
        KeyCode::Char('j') if ctrl => Some(Message::CopyJsonSafe(editing)),
        KeyCode::Char('y') if ctrl => Some(Message::CopyFormatted(editing)),
        KeyCode::Char('a') if ctrl => Some(Message::EditorSelectAll),
        KeyCode::Char(c) if !ctrl && !alt => Some(Message::EditorInsertChar(c)),
        KeyCode::Enter => Some(Message::EditorSplitLine),
        KeyCode::Backspace => Some(Message::EditorDeleteBack),
        KeyCode::Delete => Some(Message::EditorDeleteForward),
        KeyCode::Left if ctrl => Some(Message::EditorMoveWordLeft),
        KeyCode::Right if ctrl => Some(Message::EditorMoveWordRight),
        KeyCode::Home if ctrl => Some(Message::EditorMoveToStart),
        KeyCode::End if ctrl => Some(Message::EditorMoveToEnd),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            let direction = match key.code {
                KeyCode::Up => Direction::Up,
                KeyCode::Down => Direction::Down,
                KeyCode::Left => Direction::Left,
                _ => Direction::Right,
            };
            if shift {
                Some(Message::EditorExtendSelection(direction))
            } else {
                Some(Message::EditorMoveCursor(direction))
            }
        }
        KeyCode::Home => Some(Message::EditorMoveHome),
        KeyCode::End => Some(Message::EditorMoveEnd),
        KeyCode::Tab => Some(Message::EditorInsertStr("  ".to_string())),
        _ => None,
    }
}

/// Toolbar shortcut bound to `key`, if any.
pub(super) fn token_for_key(key: KeyEvent) -> Option<MarkdownToken> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    if ctrl {
        return match c {
            'b' => Some(MarkdownToken::Bold),
            'k' => Some(MarkdownToken::Link),
            _ => None,
        };
    }
    if !alt {
        return None;
    }
    match c {
        'i' => Some(MarkdownToken::Italic),
        '1' => Some(MarkdownToken::Heading1),
        '2' => Some(MarkdownToken::Heading2),
        '3' => Some(MarkdownToken::Heading3),
        'l' => Some(MarkdownToken::BulletList),
        'n' => Some(MarkdownToken::NumberedList),
        'c' => Some(MarkdownToken::InlineCode),
        'b' => Some(MarkdownToken::CodeBlock),
        'q' => Some(MarkdownToken::Quote),
        _ => None,
    }
}

fn preview_page(model: &Model) -> usize {
    model.preview_page_height().saturating_sub(1).max(1)
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
