use std::path::PathBuf;

use crate::app::Model;
use crate::config::ViewMode;
use crate::diagram::DiagramOutcome;
use crate::editor::Direction;
use crate::enhance::{EnhanceOutcome, TransformKind};
use crate::sync::{Pane, forward_wheel};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    InsertChar(char),
    /// Pasted or otherwise bulk-inserted text
    InsertText(String),
    InsertNewline,
    DeleteBack,
    DeleteForward,
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,
    CursorPageUp,
    CursorPageDown,
    /// Place the cursor at (line, col), e.g. from a click
    MoveCursorTo(usize, usize),
    /// Empty the document
    ClearDocument,

    // Rendering
    /// Re-render the preview after edits settle
    RenderPreview,
    /// A diagram worker finished
    DiagramResolved(DiagramOutcome),

    // Scrolling
    /// Scroll a pane's content by n rows (negative is up)
    ScrollPane(Pane, isize),
    /// Wheel over a pane's border or title
    ForwardWheel(Pane, isize),
    /// A pane's offset changed
    PaneScrolled(Pane),
    /// A frame was drawn
    FrameBoundary,

    // View
    SetViewMode(ViewMode),
    CycleViewMode,
    ToggleHelp,
    HideHelp,

    // Enhancement
    OpenEnhanceMenu,
    CloseEnhanceMenu,
    EnhanceMenuUp,
    EnhanceMenuDown,
    EnhanceMenuSelect,
    Enhance(TransformKind),
    EnhanceFinished(EnhanceOutcome),

    // Files
    StartImport,
    /// Current contents of the import prompt
    ImportInput(String),
    CancelImport,
    ImportFile(PathBuf),
    Export,
    /// Write the preview as plain text
    Print,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Redraw screen
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. File I/O
/// and worker hand-off happen in the side-effect pass.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Editing
        Message::InsertChar(ch) => {
            model.editor.insert_char(ch);
            model.after_edit(true);
        }
        Message::InsertText(text) => {
            model.editor.insert_str(&text);
            model.after_edit(true);
        }
        Message::InsertNewline => {
            model.editor.split_line();
            model.after_edit(true);
        }
        Message::DeleteBack => {
            let changed = model.editor.delete_back();
            model.after_edit(changed);
        }
        Message::DeleteForward => {
            let changed = model.editor.delete_forward();
            model.after_edit(changed);
        }
        Message::MoveCursor(direction) => {
            model.editor.move_cursor(direction);
            model.after_edit(false);
        }
        Message::MoveHome => {
            model.editor.move_home();
            model.after_edit(false);
        }
        Message::MoveEnd => {
            model.editor.move_end();
            model.after_edit(false);
        }
        Message::MoveWordLeft => {
            model.editor.move_word_left();
            model.after_edit(false);
        }
        Message::MoveWordRight => {
            model.editor.move_word_right();
            model.after_edit(false);
        }
        Message::MoveToStart => {
            model.editor.move_to_start();
            model.after_edit(false);
        }
        Message::MoveToEnd => {
            model.editor.move_to_end();
            model.after_edit(false);
        }
        Message::CursorPageUp => {
            let rows = page_rows(&model);
            model.editor.move_lines(-rows);
            model.after_edit(false);
        }
        Message::CursorPageDown => {
            let rows = page_rows(&model);
            model.editor.move_lines(rows);
            model.after_edit(false);
        }
        Message::MoveCursorTo(line, col) => {
            model.editor.move_to(line, col);
            model.after_edit(false);
        }
        Message::ClearDocument => {
            model.replace_document("");
        }

        // Rendering
        Message::RenderPreview => {
            model.rerender();
        }
        Message::DiagramResolved(outcome) => {
            model.apply_diagram_outcome(outcome);
        }

        // Scrolling
        Message::ScrollPane(pane, rows) => {
            if model.viewport_mut(pane).scroll_by(rows) {
                model.on_pane_scrolled(pane);
            }
        }
        Message::ForwardWheel(pane, rows) => {
            #[allow(clippy::cast_precision_loss)]
            let moved = forward_wheel(model.viewport_mut(pane), rows as f64);
            if moved {
                model.on_pane_scrolled(pane);
            }
        }
        Message::PaneScrolled(pane) => {
            model.on_pane_scrolled(pane);
        }
        Message::FrameBoundary => {
            model.scroll_sync.on_frame();
        }

        // View
        Message::SetViewMode(mode) => {
            model.preferred_view = mode;
            model.apply_layout();
        }
        Message::CycleViewMode => {
            model.preferred_view = model.view_mode.cycle();
            model.apply_layout();
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Enhancement
        Message::OpenEnhanceMenu => {
            model.enhance_menu = Some(0);
        }
        Message::CloseEnhanceMenu => {
            model.enhance_menu = None;
        }
        Message::EnhanceMenuUp => {
            if let Some(selected) = model.enhance_menu.as_mut() {
                *selected = selected.saturating_sub(1);
            }
        }
        Message::EnhanceMenuDown => {
            if let Some(selected) = model.enhance_menu.as_mut() {
                *selected = (*selected + 1).min(TransformKind::ALL.len() - 1);
            }
        }
        Message::EnhanceMenuSelect => {
            if let Some(kind) = model
                .enhance_menu
                .and_then(|idx| TransformKind::ALL.get(idx).copied())
            {
                model.request_enhancement(kind);
            }
        }
        Message::Enhance(kind) => {
            model.request_enhancement(kind);
        }
        Message::EnhanceFinished(outcome) => {
            model.apply_enhance_outcome(outcome);
        }

        // Files
        Message::StartImport => {
            model.import_prompt = Some(String::new());
        }
        Message::ImportInput(text) => {
            if model.import_prompt.is_some() {
                model.import_prompt = Some(text);
            }
        }
        Message::CancelImport | Message::ImportFile(_) => {
            model.import_prompt = None;
        }
        Message::Export | Message::Print | Message::Redraw => {}

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.apply_layout();
        }

        // Application
        Message::Quit => {
            model.diagrams.cancel_all();
            model.should_quit = true;
        }
    }
    model
}

fn page_rows(model: &Model) -> isize {
    isize::try_from(model.source_view.height().max(1)).unwrap_or(1)
}
