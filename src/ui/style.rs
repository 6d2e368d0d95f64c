//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette, with darker
//! indexed colors when the terminal background is light.

use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::style::{Color, Modifier, Style};

use crate::preview::{InlineStyle, LineType};

static LIGHT_BACKGROUND: AtomicBool = AtomicBool::new(false);

/// Pick colors for a light (`true`) or dark terminal background.
pub fn set_light_background(light: bool) {
    LIGHT_BACKGROUND.store(light, Ordering::Relaxed);
}

pub fn is_light_background() -> bool {
    LIGHT_BACKGROUND.load(Ordering::Relaxed)
}

/// Get the style for a given preview line type.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    let light_bg = is_light_background();
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Cyan
            })
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(if light_bg {
                Color::Indexed(22)
            } else {
                Color::Green
            })
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => Style::default()
            .fg(if light_bg {
                Color::Indexed(58)
            } else {
                Color::Yellow
            })
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Blue
            })
            .add_modifier(Modifier::BOLD),

        LineType::CodeBlock => Style::default()
            .fg(if light_bg {
                Color::Indexed(238)
            } else {
                Color::Indexed(245)
            })
            .add_modifier(Modifier::DIM),

        LineType::BlockQuote => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Blue
            })
            .add_modifier(Modifier::ITALIC),

        LineType::HorizontalRule => Style::default()
            .fg(if light_bg {
                Color::Indexed(241)
            } else {
                Color::Indexed(240)
            })
            .add_modifier(Modifier::DIM),

        LineType::Placeholder => placeholder_style(),

        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => {
            Style::default()
        }
    }
}

/// Get the style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let light_bg = is_light_background();
    let mut style = base;

    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style
            .add_modifier(Modifier::UNDERLINED)
            .fg(if light_bg {
                Color::Blue
            } else {
                Color::LightBlue
            });
    }
    if inline.code {
        style = style
            .fg(if light_bg {
                Color::Indexed(88)
            } else {
                Color::Red
            })
            .add_modifier(Modifier::BOLD);
    }

    style
}

pub fn placeholder_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(243)
        } else {
            Color::Indexed(245)
        })
        .add_modifier(Modifier::ITALIC)
}

/// Highlight for the selected list entry; dimmer when the list lacks focus.
pub fn selected_entry_style(focused: bool) -> Style {
    if focused {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    }
}

pub fn cursor_style() -> Style {
    if is_light_background() {
        Style::default().bg(Color::Black).fg(Color::White)
    } else {
        Style::default().bg(Color::White).fg(Color::Black)
    }
}

pub fn selection_style() -> Style {
    Style::default().bg(if is_light_background() {
        Color::Indexed(152)
    } else {
        Color::DarkGray
    })
}

pub fn toolbar_label_style(active: bool) -> Style {
    if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    }
}

pub fn toolbar_key_style() -> Style {
    Style::default().fg(Color::Indexed(if is_light_background() { 241 } else { 245 }))
}

pub fn copied_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(22)
        } else {
            Color::Green
        })
        .add_modifier(Modifier::BOLD)
}
