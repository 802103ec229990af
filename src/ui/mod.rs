//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Colors for rendered markdown
//! - pane layout shared by rendering, mouse hit-testing and the model

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use render::{line_number_width, render, source_column_offset};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::config::ViewMode;

/// Below this terminal width `Split` falls back to `Edit`.
pub const NARROW_WIDTH: u16 = 80;

/// Horizontal padding inside the preview border.
pub const PREVIEW_PADDING: u16 = 1;

pub const SOURCE_TITLE: &str = " INPUT.MD ";
pub const PREVIEW_TITLE: &str = " PREVIEW ";

/// Outer rectangles (borders included) of the visible panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneAreas {
    pub source: Option<Rect>,
    pub preview: Option<Rect>,
    pub status: Rect,
}

/// Split the terminal into panes for `mode`. The last row is the status bar.
pub fn pane_areas(area: Rect, mode: ViewMode) -> PaneAreas {
    let body = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };
    let (source, preview) = match mode {
        ViewMode::Split => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(body);
            (Some(columns[0]), Some(columns[1]))
        }
        ViewMode::Edit => (Some(body), None),
        ViewMode::Preview => (None, Some(body)),
    };
    PaneAreas {
        source,
        preview,
        status,
    }
}

/// Text area of the source pane: inside the border, right of the gutter.
pub fn source_content_area(outer: Rect, line_count: usize) -> Rect {
    let inner = shrink(outer, 1, 1);
    let gutter = line_number_width(line_count) + 1;
    Rect {
        x: inner.x + gutter.min(inner.width),
        width: inner.width.saturating_sub(gutter),
        ..inner
    }
}

/// Text area of the preview pane: inside the border and padding.
pub fn preview_content_area(outer: Rect) -> Rect {
    shrink(outer, 1 + PREVIEW_PADDING, 1)
}

fn shrink(rect: Rect, horizontal: u16, vertical: u16) -> Rect {
    let width = rect.width.saturating_sub(horizontal * 2);
    let height = rect.height.saturating_sub(vertical * 2);
    Rect {
        x: rect.x + horizontal.min(rect.width / 2),
        y: rect.y + vertical.min(rect.height / 2),
        width,
        height,
    }
}
