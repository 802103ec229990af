use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};
use crate::config::ViewMode;
use crate::editor::Direction;
use crate::enhance::TransformKind;
use crate::sync::Pane;

use super::event_loop::Debouncer;

/// Rows moved per wheel notch.
const WHEEL_ROWS: isize = 3;

/// Spaces inserted for Tab.
const TAB_TEXT: &str = "    ";

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut Debouncer<(u16, u16)>,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => {
                if let Some(current) = &model.import_prompt {
                    let mut next = current.clone();
                    next.push_str(text.trim_end_matches(['\r', '\n']));
                    Some(Message::ImportInput(next))
                } else {
                    Some(Message::InsertText(text.clone()))
                }
            }
            Event::Resize(w, h) => {
                crate::debug_log::record("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue((*w, *h), now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible || model.enhance_menu.is_some() || model.import_prompt.is_some() {
            return None;
        }

        let (width, height) = model.terminal_size;
        let areas = crate::ui::pane_areas(Rect::new(0, 0, width, height), model.view_mode);

        for (pane, outer) in [(Pane::Source, areas.source), (Pane::Rendered, areas.preview)] {
            let Some(outer) = outer else {
                continue;
            };
            if !point_in_rect(mouse.column, mouse.row, outer) {
                continue;
            }
            let content = match pane {
                Pane::Source => crate::ui::source_content_area(outer, model.editor.line_count()),
                Pane::Rendered => crate::ui::preview_content_area(outer),
            };
            let in_content = point_in_rect(mouse.column, mouse.row, content);
            let delta = match mouse.kind {
                MouseEventKind::ScrollDown => WHEEL_ROWS,
                MouseEventKind::ScrollUp => -WHEEL_ROWS,
                MouseEventKind::Down(MouseButton::Left) if in_content && pane == Pane::Source => {
                    let line = model.source_view.offset() + usize::from(mouse.row - content.y);
                    let col = usize::from(mouse.column - content.x)
                        + crate::ui::source_column_offset(model.editor.cursor().col, content.width);
                    return Some(Message::MoveCursorTo(line, col));
                }
                _ => return None,
            };
            return if in_content {
                Some(Message::ScrollPane(pane, delta))
            } else {
                Some(Message::ForwardWheel(pane, delta))
            };
        }
        None
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('q') {
            return Some(Message::Quit);
        }

        if model.help_visible {
            return Some(Message::HideHelp);
        }

        if model.enhance_menu.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Message::CloseEnhanceMenu),
                KeyCode::Up | KeyCode::Char('k') => Some(Message::EnhanceMenuUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::EnhanceMenuDown),
                KeyCode::Enter => Some(Message::EnhanceMenuSelect),
                KeyCode::Char(c @ '1'..='4') => {
                    let idx = (c as usize) - ('1' as usize);
                    TransformKind::ALL.get(idx).copied().map(Message::Enhance)
                }
                _ => None,
            };
        }

        if let Some(current) = model.import_prompt.as_ref() {
            return match key.code {
                KeyCode::Esc => Some(Message::CancelImport),
                KeyCode::Enter => {
                    let path = current.trim();
                    if path.is_empty() {
                        Some(Message::CancelImport)
                    } else {
                        Some(Message::ImportFile(PathBuf::from(path)))
                    }
                }
                KeyCode::Backspace => {
                    let mut next = current.clone();
                    next.pop();
                    Some(Message::ImportInput(next))
                }
                KeyCode::Char(c) if !ctrl && !alt => {
                    let mut next = current.clone();
                    next.push(c);
                    Some(Message::ImportInput(next))
                }
                _ => None,
            };
        }

        match key.code {
            // Application
            KeyCode::F(1) => Some(Message::ToggleHelp),
            KeyCode::F(2) => Some(Message::SetViewMode(ViewMode::Split)),
            KeyCode::F(3) => Some(Message::SetViewMode(ViewMode::Edit)),
            KeyCode::F(4) => Some(Message::SetViewMode(ViewMode::Preview)),
            KeyCode::Char('\\') if ctrl => Some(Message::CycleViewMode),
            KeyCode::Char('g') if ctrl => Some(Message::OpenEnhanceMenu),
            KeyCode::Char('o') if ctrl => Some(Message::StartImport),
            KeyCode::Char('s') if ctrl => Some(Message::Export),
            KeyCode::Char('p') if ctrl => Some(Message::Print),
            KeyCode::Char('l') if ctrl => Some(Message::ClearDocument),

            // Pane scrolling
            KeyCode::Up if alt => Some(Message::ScrollPane(Pane::Rendered, -1)),
            KeyCode::Down if alt => Some(Message::ScrollPane(Pane::Rendered, 1)),
            KeyCode::Up if ctrl => Some(Message::ScrollPane(Pane::Source, -1)),
            KeyCode::Down if ctrl => Some(Message::ScrollPane(Pane::Source, 1)),

            // Preview-only mode scrolls instead of editing
            KeyCode::Up | KeyCode::Char('k') if model.view_mode == ViewMode::Preview => {
                Some(Message::ScrollPane(Pane::Rendered, -1))
            }
            KeyCode::Down | KeyCode::Char('j') if model.view_mode == ViewMode::Preview => {
                Some(Message::ScrollPane(Pane::Rendered, 1))
            }
            KeyCode::PageUp if model.view_mode == ViewMode::Preview => {
                let rows = isize::try_from(model.preview_view.height()).unwrap_or(1);
                Some(Message::ScrollPane(Pane::Rendered, -rows))
            }
            KeyCode::PageDown if model.view_mode == ViewMode::Preview => {
                let rows = isize::try_from(model.preview_view.height()).unwrap_or(1);
                Some(Message::ScrollPane(Pane::Rendered, rows))
            }
            _ if model.view_mode == ViewMode::Preview => None,

            // Cursor movement
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::CursorPageUp),
            KeyCode::PageDown => Some(Message::CursorPageDown),

            // Editing
            KeyCode::Enter => Some(Message::InsertNewline),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Tab => Some(Message::InsertText(TAB_TEXT.to_string())),
            KeyCode::Char(c) if !ctrl && !alt => Some(Message::InsertChar(c)),

            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
