use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::{
    PREVIEW_PADDING, PREVIEW_TITLE, SOURCE_TITLE, overlays, pane_areas, source_content_area,
    status,
};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let areas = pane_areas(area, model.view_mode);

    if let Some(outer) = areas.source {
        render_source(model, frame, outer);
    }
    if let Some(outer) = areas.preview {
        render_preview(model, frame, outer);
    }

    let body = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    status::render_toasts(model, frame, body);
    status::render_status_bar(model, frame, areas.status);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if let Some(selected) = model.enhance_menu {
        overlays::render_enhance_menu(frame, area, selected);
    } else if let Some(input) = model.import_prompt.as_deref() {
        overlays::render_import_prompt(frame, area, input);
    }
}

fn pane_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn render_source(model: &Model, frame: &mut Frame, outer: Rect) {
    let buf = &model.editor;
    let total_lines = buf.line_count();
    let content_area = source_content_area(outer, total_lines);
    let gutter_width = line_number_width(total_lines);
    let gutter_area = Rect {
        x: content_area.x.saturating_sub(gutter_width + 1),
        width: gutter_width + 1,
        ..content_area
    };

    frame.render_widget(Clear, outer);
    frame.render_widget(pane_block(SOURCE_TITLE), outer);

    let range = model.source_view.visible_range();
    let cursor = buf.cursor();
    let width = usize::from(content_area.width);
    let h_offset = source_column_offset(cursor.col, content_area.width);

    let mut numbers: Vec<Line> = Vec::with_capacity(range.len());
    let mut content: Vec<Line> = Vec::with_capacity(range.len());
    for line_idx in range {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        numbers.push(Line::styled(
            format!("{:>width$} ", line_idx + 1, width = gutter_width as usize),
            Style::default().fg(Color::DarkGray),
        ));

        let visible: Vec<char> = line_text.chars().skip(h_offset).take(width).collect();
        if line_idx == cursor.line {
            // Split line at cursor position for cursor rendering
            let col = cursor.col.saturating_sub(h_offset).min(visible.len());
            let before: String = visible[..col].iter().collect();
            let cursor_char = visible.get(col).map_or_else(|| " ".to_string(), char::to_string);
            let after: String = visible.get(col + 1..).unwrap_or_default().iter().collect();

            let mut spans = Vec::with_capacity(3);
            if !before.is_empty() {
                spans.push(Span::raw(before));
            }
            spans.push(Span::styled(
                cursor_char,
                Style::default().bg(Color::White).fg(Color::Black),
            ));
            if !after.is_empty() {
                spans.push(Span::raw(after));
            }
            content.push(Line::from(spans));
        } else {
            content.push(Line::raw(visible.into_iter().collect::<String>()));
        }
    }

    frame.render_widget(Paragraph::new(numbers), gutter_area);
    frame.render_widget(Paragraph::new(content), content_area);
}

fn render_preview(model: &Model, frame: &mut Frame, outer: Rect) {
    let range = model.preview_view.visible_range();
    let lines = model
        .preview_lines
        .get(range.start..range.end.min(model.preview_lines.len()))
        .unwrap_or_default();

    let content: Vec<Line> = lines
        .iter()
        .map(|line| {
            let line_style = super::style::style_for_line_type(line.line_type());
            if let Some(spans) = line.spans() {
                Line::from(
                    spans
                        .iter()
                        .map(|span| {
                            Span::styled(
                                span.text().to_string(),
                                super::style::style_for_inline(line_style, span.style()),
                            )
                        })
                        .collect::<Vec<_>>(),
                )
            } else {
                Line::from(Span::styled(line.content().to_string(), line_style))
            }
        })
        .collect();

    let block = pane_block(PREVIEW_TITLE).padding(Padding::horizontal(PREVIEW_PADDING));
    // Clear first so raster cell colors from previous frames do not leak.
    frame.render_widget(Clear, outer);
    frame.render_widget(Paragraph::new(content).block(block), outer);
}

/// First visible source column, chosen so the cursor stays on screen.
pub fn source_column_offset(cursor_col: usize, width: u16) -> usize {
    let width = usize::from(width);
    if width == 0 {
        return 0;
    }
    (cursor_col + 1).saturating_sub(width)
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}
