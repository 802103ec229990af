use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;
use crate::enhance::TransformKind;

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

    let lines = vec![
        Line::styled("View", section_style),
        Line::raw("  F2 / F3 / F4        Split / Edit / Preview"),
        Line::raw("  Ctrl+\\              Cycle view"),
        Line::raw("  Alt+Up/Down         Scroll preview"),
        Line::raw("  Ctrl+Up/Down        Scroll source"),
        Line::raw("  Mouse wheel         Scroll pane under pointer"),
        Line::raw(""),
        Line::styled("Editor", section_style),
        Line::raw("  Arrows, Home/End    Navigate"),
        Line::raw("  Ctrl+Left/Right     Word movement"),
        Line::raw("  Ctrl+Home/End       Document start / end"),
        Line::raw("  PageUp/PageDown     Page"),
        Line::raw("  Ctrl+L              Clear document"),
        Line::raw(""),
        Line::styled("Files", section_style),
        Line::raw("  Ctrl+O              Import .md / .txt"),
        Line::raw(format!(
            "  Ctrl+S              Export {}",
            crate::files::EXPORT_FILE_NAME
        )),
        Line::raw(format!(
            "  Ctrl+P              Print preview to {}",
            crate::files::PRINT_FILE_NAME
        )),
        Line::raw(""),
        Line::styled("Other", section_style),
        Line::raw("  Ctrl+G              Enhance with Gemini"),
        Line::raw("  F1                  Toggle help"),
        Line::raw("  Ctrl+Q              Quit"),
        Line::raw(""),
        Line::styled("Config", section_style),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ];

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_enhance_menu(frame: &mut Frame, area: Rect, selected: usize) {
    let height = u16::try_from(TransformKind::ALL.len()).unwrap_or(4) + 4;
    let popup = centered_popup_rect(36, height, area);

    let lines: Vec<Line> = TransformKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let text = format!(" {}  {}", idx + 1, kind.label());
            if idx == selected {
                Line::styled(text, Style::default().bg(Color::Magenta).fg(Color::White))
            } else {
                Line::raw(text)
            }
        })
        .collect();

    let block = Block::default()
        .title("Magic Enhance")
        .borders(Borders::ALL)
        .padding(Padding::vertical(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_import_prompt(frame: &mut Frame, area: Rect, input: &str) {
    let popup_width = area.width.saturating_sub(8).clamp(20, 72);
    let popup = centered_popup_rect(popup_width, 5, area);

    let lines = vec![
        Line::from(vec![
            Span::raw("Path: "),
            Span::raw(input.to_string()),
            Span::styled(" ", Style::default().bg(Color::White)),
        ]),
        Line::styled(
            "Enter imports \u{2502} Esc cancels",
            Style::default().fg(Color::Indexed(245)),
        ),
    ];

    let block = Block::default()
        .title("Import")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
