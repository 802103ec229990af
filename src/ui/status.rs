use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let enhancing = model
        .enhancing
        .map(|kind| format!("  [{}…]", kind.label()))
        .unwrap_or_default();
    let narrow = if model.view_mode == model.preferred_view {
        ""
    } else {
        " (narrow)"
    };

    let status = format!(
        " {}  {}{}  CHARS: {}  WORDS: {}{}  F1:help",
        model.file_label,
        model.view_mode.as_str().to_ascii_uppercase(),
        narrow,
        model.editor.char_count(),
        model.editor.word_count(),
        enhancing,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

/// Stack active toasts upward from the bottom of `body`, newest lowest.
pub fn render_toasts(model: &Model, frame: &mut Frame, body: Rect) {
    let toasts: Vec<_> = model.active_toasts().collect();
    let bottom = body.y + body.height;
    for (row, (message, level)) in toasts.iter().rev().enumerate() {
        let Ok(row) = u16::try_from(row + 1) else {
            break;
        };
        if row > body.height {
            break;
        }
        let area = Rect {
            y: bottom - row,
            height: 1,
            ..body
        };
        let (prefix, style) = match level {
            ToastLevel::Info => (
                "[info]",
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ),
            ToastLevel::Success => ("[ok]", Style::default().bg(Color::Green).fg(Color::Black)),
            ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
        };
        let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
        frame.render_widget(toast, area);
    }
}
