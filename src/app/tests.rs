use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tempfile::tempdir;

use crate::config::ViewMode;
use crate::diagram::{
    DiagramEngine, DiagramError, DiagramOutcome, DiagramRequest, DiagramSet, DiagramState,
    DiagramTheme, ERROR_LABEL,
};
use crate::enhance::{EnhanceError, EnhanceOutcome, Enhancer, TransformKind};
use crate::sync::{Pane, SyncLock};

use super::effects::Workers;
use super::event_loop::{Debouncer, is_text_edit};
use super::{App, DEFAULT_DOCUMENT, Message, Model, ToastLevel, update};

struct FakeEngine;

impl DiagramEngine for FakeEngine {
    fn render(&self, request: &DiagramRequest) -> Result<String, DiagramError> {
        if request.source.contains("bad") {
            Err(DiagramError::Engine("Parse error on line 1".to_string()))
        } else {
            Ok("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>".to_string())
        }
    }
}

struct FailingEnhancer;

impl Enhancer for FailingEnhancer {
    fn enhance(&self, _content: &str, _kind: TransformKind) -> Result<String, EnhanceError> {
        Err(EnhanceError::Transport("connection refused".to_string()))
    }
}

struct ShoutingEnhancer;

impl Enhancer for ShoutingEnhancer {
    fn enhance(&self, content: &str, _kind: TransformKind) -> Result<String, EnhanceError> {
        Ok(content.to_uppercase())
    }
}

fn diagrams() -> DiagramSet {
    DiagramSet::new(true, DiagramTheme::Default)
}

fn create_test_model() -> Model {
    Model::new("# Test\n\nHello world", (100, 24), ViewMode::Split, diagrams())
}

/// Enough paragraphs that both panes overflow.
fn create_long_test_model() -> Model {
    let md = (1..=100)
        .map(|i| format!("Line {i} of content."))
        .collect::<Vec<_>>()
        .join("\n\n");
    Model::new(&md, (100, 24), ViewMode::Split, diagrams())
}

fn test_app() -> App {
    App::new(None)
        .with_diagram_engine(Arc::new(FakeEngine))
        .with_enhancer(Arc::new(ShoutingEnhancer))
}

fn range(model: &Model, pane: Pane) -> f64 {
    let view = model.viewport(pane);
    #[allow(clippy::cast_precision_loss)]
    let range = view.total_lines().saturating_sub(view.height() as usize) as f64;
    range
}

fn preview_text(model: &Model) -> String {
    model
        .preview_lines
        .iter()
        .map(|line| line.content().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn toasts(model: &Model) -> Vec<(String, ToastLevel)> {
    model
        .active_toasts()
        .map(|(message, level)| (message.to_string(), level))
        .collect()
}

// Scroll synchronization

#[test]
fn test_source_scroll_moves_preview_proportionally() {
    let model = create_long_test_model();
    assert!(range(&model, Pane::Source) > 0.0);
    assert!(range(&model, Pane::Rendered) > 0.0);

    let model = update(model, Message::ScrollPane(Pane::Source, 30));
    assert_eq!(model.source_view.offset(), 30);

    let expected = 30.0 / range(&model, Pane::Source) * range(&model, Pane::Rendered);
    #[allow(clippy::cast_precision_loss)]
    let actual = model.preview_view.offset() as f64;
    assert!((actual - expected).abs() <= 1.0, "{actual} vs {expected}");
    assert_eq!(model.scroll_sync.lock(), SyncLock::Held(Pane::Source));
}

#[test]
fn test_preview_echo_is_suppressed_until_frame_boundary() {
    let mut model = update(create_long_test_model(), Message::ScrollPane(Pane::Source, 30));
    let echoes = model.take_pending_messages();
    assert_eq!(echoes, vec![Message::PaneScrolled(Pane::Rendered)]);

    let preview_offset = model.preview_view.offset();
    for msg in echoes {
        model = update(model, msg);
    }
    assert_eq!(model.source_view.offset(), 30, "echo must not move the source");
    assert!(model.take_pending_messages().is_empty());

    let model = update(model, Message::FrameBoundary);
    assert_eq!(model.scroll_sync.lock(), SyncLock::Free);

    let model = update(model, Message::ScrollPane(Pane::Rendered, 20));
    assert_eq!(model.preview_view.offset(), preview_offset + 20);
    assert!(model.source_view.offset() > 30);
}

#[test]
fn test_dispatch_feeds_back_and_suppresses_echo() {
    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = create_long_test_model();

    App::dispatch(&mut model, &workers, Message::ScrollPane(Pane::Source, 10));

    assert_eq!(model.source_view.offset(), 10);
    assert!(model.preview_view.offset() > 0);
    assert!(model.take_pending_messages().is_empty());
}

#[test]
fn test_sync_is_off_outside_split_view() {
    let model = update(create_long_test_model(), Message::SetViewMode(ViewMode::Edit));
    let model = update(model, Message::ScrollPane(Pane::Source, 10));
    assert_eq!(model.source_view.offset(), 10);
    assert_eq!(model.preview_view.offset(), 0);
    assert_eq!(model.scroll_sync.lock(), SyncLock::Free);
}

#[test]
fn test_short_document_does_not_sync() {
    let model = update(create_test_model(), Message::ScrollPane(Pane::Source, 5));
    assert_eq!(model.source_view.offset(), 0);
    assert_eq!(model.preview_view.offset(), 0);
}

#[test]
fn test_forward_wheel_scrolls_pane() {
    let model = update(create_long_test_model(), Message::ForwardWheel(Pane::Rendered, 3));
    assert_eq!(model.preview_view.offset(), 3);
    assert!(model.source_view.offset() > 0);
}

#[test]
fn test_cursor_moving_offscreen_scrolls_source() {
    let mut model = create_long_test_model();
    for _ in 0..40 {
        model = update(model, Message::MoveCursor(crate::editor::Direction::Down));
        model = update(model, Message::FrameBoundary);
    }
    assert_eq!(model.editor.cursor().line, 40);
    assert!(model.source_view.visible_range().contains(&40));
    assert!(model.preview_view.offset() > 0);
}

// Editing and rendering

#[test]
fn test_typing_defers_render_until_requested() {
    let model = update(create_test_model(), Message::MoveToEnd);
    let model = update(model, Message::InsertChar('!'));
    assert!(model.render_pending);
    assert!(!preview_text(&model).contains("Hello world!"));

    let model = update(model, Message::RenderPreview);
    assert!(!model.render_pending);
    assert!(preview_text(&model).contains("Hello world!"));
}

#[test]
fn test_clear_document_empties_buffer_and_preview() {
    let model = update(create_test_model(), Message::ClearDocument);
    assert!(model.editor.is_empty());
    assert!(preview_text(&model).trim().is_empty());
    assert_eq!(model.revision, 1);
}

#[test]
fn test_insert_newline_splits_line() {
    let model = update(create_test_model(), Message::MoveCursorTo(2, 5));
    let model = update(model, Message::InsertNewline);
    assert_eq!(model.editor.text(), "# Test\n\nHello\n world");
}

#[test]
fn test_default_document_issues_diagram_attempt() {
    let mut model = Model::new(DEFAULT_DOCUMENT, (120, 40), ViewMode::Split, diagrams());
    assert_eq!(model.take_pending_attempts().len(), 1);
    assert!(preview_text(&model).contains("Rendering diagram"));
}

// Diagrams

#[test]
fn test_stale_diagram_result_is_discarded() {
    let mut model = Model::new(
        "```mermaid\ngraph TD\nA-->B\n```",
        (100, 24),
        ViewMode::Split,
        diagrams(),
    );
    let first = model.take_pending_attempts().remove(0);

    model.replace_document("```mermaid\ngraph TD\nA-->C\n```");
    let second = model.take_pending_attempts().remove(0);
    assert_ne!(first.token.generation(), second.token.generation());
    assert_ne!(first.request.render_id, second.request.render_id);

    let model = update(
        model,
        Message::DiagramResolved(DiagramOutcome {
            slot: 0,
            generation: first.token.generation(),
            result: Ok("<svg/>".to_string()),
        }),
    );
    assert_eq!(model.diagrams.get(0).unwrap().state(), &DiagramState::Pending);
}

#[test]
fn test_diagram_failure_shows_error_box() {
    let mut model = Model::new(
        "```mermaid\nbad\n```",
        (100, 24),
        ViewMode::Split,
        diagrams(),
    );
    let attempt = model.take_pending_attempts().remove(0);
    let model = update(
        model,
        Message::DiagramResolved(DiagramOutcome {
            slot: attempt.slot,
            generation: attempt.token.generation(),
            result: Err(DiagramError::Engine("Parse error on line 1".to_string())),
        }),
    );
    let text = preview_text(&model);
    assert!(text.contains(ERROR_LABEL));
    assert!(text.contains("Parse error on line 1"));
}

#[test]
fn test_diagram_worker_round_trip_through_workers() {
    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = Model::new(
        "```mermaid\ngraph TD\nA-->B\n```",
        (100, 24),
        ViewMode::Split,
        diagrams(),
    );
    App::dispatch_work(&mut model, &workers);

    let outcome = workers
        .diagrams
        .wait(Duration::from_secs(5))
        .expect("worker should answer");
    App::dispatch(&mut model, &workers, Message::DiagramResolved(outcome));

    assert!(matches!(
        model.diagrams.get(0).unwrap().state(),
        DiagramState::Rendered { .. }
    ));
    assert!(!preview_text(&model).contains("Rendering diagram"));
}

#[test]
fn test_disabled_diagrams_issue_no_attempts() {
    let mut model = Model::new(
        "```mermaid\ngraph TD\nA-->B\n```",
        (100, 24),
        ViewMode::Split,
        DiagramSet::new(false, DiagramTheme::Default),
    );
    assert!(model.take_pending_attempts().is_empty());
    assert!(preview_text(&model).contains("A-->B"));
}

// Enhancement

#[test]
fn test_enhancement_failure_leaves_document_and_toasts_once() {
    let app = App::new(None)
        .with_diagram_engine(Arc::new(FakeEngine))
        .with_enhancer(Arc::new(FailingEnhancer));
    let workers = Workers::new(&app);
    let mut model = create_test_model();
    let before = model.editor.text();

    App::dispatch(&mut model, &workers, Message::Enhance(TransformKind::Grammar));
    assert_eq!(model.enhancing, Some(TransformKind::Grammar));

    let outcome = workers
        .enhance
        .wait(Duration::from_secs(5))
        .expect("worker should answer");
    App::dispatch(&mut model, &workers, Message::EnhanceFinished(outcome));

    assert_eq!(model.editor.text(), before);
    assert_eq!(model.enhancing, None);
    let toasts = toasts(&model);
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].1, ToastLevel::Error);
    assert!(toasts[0].0.starts_with("Oops! Failed to enhance content"));
}

#[test]
fn test_enhancement_success_replaces_document() {
    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = create_test_model();

    App::dispatch(&mut model, &workers, Message::Enhance(TransformKind::Funky));
    let outcome = workers
        .enhance
        .wait(Duration::from_secs(5))
        .expect("worker should answer");
    App::dispatch(&mut model, &workers, Message::EnhanceFinished(outcome));

    assert_eq!(model.editor.text(), "# TEST\n\nHELLO WORLD");
    assert!(preview_text(&model).contains("HELLO WORLD"));
    assert_eq!(toasts(&model)[0].1, ToastLevel::Success);
}

#[test]
fn test_stale_enhancement_is_discarded() {
    let mut model = update(create_test_model(), Message::Enhance(TransformKind::Summarize));
    let job = model.take_pending_enhance().unwrap();

    let model = update(model, Message::ClearDocument);
    let model = update(
        model,
        Message::EnhanceFinished(EnhanceOutcome {
            revision: job.revision,
            kind: job.kind,
            result: Ok("summary".to_string()),
        }),
    );

    assert!(model.editor.is_empty());
    assert_eq!(model.enhancing, None);
    assert!(toasts(&model).is_empty());
}

#[test]
fn test_second_enhancement_while_running_is_refused() {
    let mut model = update(create_test_model(), Message::Enhance(TransformKind::Grammar));
    assert!(model.take_pending_enhance().is_some());

    let mut model = update(model, Message::Enhance(TransformKind::Funky));
    assert!(model.take_pending_enhance().is_none());
    assert_eq!(model.enhancing, Some(TransformKind::Grammar));
    assert_eq!(toasts(&model)[0].1, ToastLevel::Info);
}

#[test]
fn test_blank_document_is_not_enhanced() {
    let model = update(create_test_model(), Message::ClearDocument);
    let mut model = update(model, Message::Enhance(TransformKind::Grammar));
    assert!(model.take_pending_enhance().is_none());
    assert_eq!(model.enhancing, None);
}

#[test]
fn test_enhance_menu_navigation_selects_transform() {
    let mut model = update(create_test_model(), Message::OpenEnhanceMenu);
    assert_eq!(model.enhance_menu, Some(0));
    for _ in 0..5 {
        model = update(model, Message::EnhanceMenuDown);
    }
    assert_eq!(model.enhance_menu, Some(3));
    let model = update(model, Message::EnhanceMenuUp);
    let mut model = update(model, Message::EnhanceMenuSelect);

    assert_eq!(model.enhance_menu, None);
    assert_eq!(model.enhancing, Some(TransformKind::Professional));
    assert_eq!(
        model.take_pending_enhance().map(|job| job.kind),
        Some(TransformKind::Professional)
    );
}

// Files

#[test]
fn test_import_rejects_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("picture.png");
    std::fs::write(&path, b"not markdown").unwrap();

    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = create_test_model();
    let before = model.editor.text();

    App::dispatch(&mut model, &workers, Message::ImportFile(path));

    assert_eq!(model.editor.text(), before);
    assert_eq!(
        toasts(&model),
        vec![(
            "Please upload a valid Markdown (.md) or Text (.txt) file.".to_string(),
            ToastLevel::Error
        )]
    );
}

/// Collects formatted log output so tests can check what reached the writer.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_user_facing_failures_stay_below_warn() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(move || writer.clone())
        .finish();

    let dir = tempdir().unwrap();
    let path = dir.path().join("picture.png");
    std::fs::write(&path, b"not markdown").unwrap();

    let model = tracing::subscriber::with_default(subscriber, || {
        let mut model = create_test_model();
        model.import_path(&path);
        let model = update(model, Message::Enhance(TransformKind::Grammar));
        let revision = model.revision;
        update(
            model,
            Message::EnhanceFinished(EnhanceOutcome {
                revision,
                kind: TransformKind::Grammar,
                result: Err(EnhanceError::MissingCredentials),
            }),
        )
    });

    let errors = toasts(&model)
        .into_iter()
        .filter(|(_, level)| *level == ToastLevel::Error)
        .count();
    assert_eq!(errors, 2);
    assert!(log.0.lock().unwrap().is_empty());
}

#[test]
fn test_terminal_owned_flag_round_trip() {
    assert!(!super::terminal_owned());
    super::set_terminal_owned(true);
    assert!(super::terminal_owned());
    super::set_terminal_owned(false);
    assert!(!super::terminal_owned());
}

#[test]
fn test_import_text_file_replaces_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = update(create_test_model(), Message::StartImport);
    assert_eq!(model.import_prompt.as_deref(), Some(""));

    App::dispatch(&mut model, &workers, Message::ImportFile(path));

    assert_eq!(model.import_prompt, None);
    assert_eq!(model.editor.text(), "hello");
    assert_eq!(model.file_label, "notes.txt");
    assert!(preview_text(&model).contains("hello"));
    assert_eq!(toasts(&model)[0].0, "File loaded successfully!");
}

#[test]
fn test_export_writes_document() {
    let dir = tempdir().unwrap();
    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = create_test_model();
    model.export_dir = dir.path().to_path_buf();

    App::dispatch(&mut model, &workers, Message::Export);

    let written =
        std::fs::read_to_string(dir.path().join(crate::files::EXPORT_FILE_NAME)).unwrap();
    assert_eq!(written, "# Test\n\nHello world");
    assert!(toasts(&model)[0].0.starts_with("Downloaded successfully!"));
}

#[test]
fn test_print_lays_out_hidden_preview_with_pending_edits() {
    let dir = tempdir().unwrap();
    let app = test_app();
    let workers = Workers::new(&app);
    let mut model = Model::new("# Test", (100, 24), ViewMode::Edit, diagrams());
    model.export_dir = dir.path().to_path_buf();
    model = update(model, Message::MoveToEnd);
    model = update(model, Message::InsertText("\n\nprinted body".to_string()));
    assert!(model.preview_lines.is_empty());

    App::dispatch(&mut model, &workers, Message::Print);

    let printed =
        std::fs::read_to_string(dir.path().join(crate::files::PRINT_FILE_NAME)).unwrap();
    assert!(printed.contains("Test"));
    assert!(printed.contains("printed body"));
    assert!(toasts(&model)[0].0.starts_with("Printed to"));
}

// View and layout

#[test]
fn test_narrow_terminal_falls_back_and_recovers() {
    let model = Model::new("# Test", (60, 24), ViewMode::Split, diagrams());
    assert_eq!(model.view_mode, ViewMode::Edit);
    assert_eq!(model.preferred_view, ViewMode::Split);

    let model = update(model, Message::Resize(120, 30));
    assert_eq!(model.view_mode, ViewMode::Split);
    assert!(model.preview_view.width() > 0);
    assert!(!model.preview_lines.is_empty());
}

#[test]
fn test_cycle_view_mode() {
    let model = update(create_test_model(), Message::CycleViewMode);
    assert_eq!(model.view_mode, ViewMode::Edit);
    let model = update(model, Message::CycleViewMode);
    assert_eq!(model.view_mode, ViewMode::Preview);
    assert_eq!(model.source_view.width(), 0);
}

#[test]
fn test_toggle_help() {
    let model = update(create_test_model(), Message::ToggleHelp);
    assert!(model.help_visible);
    let model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

#[test]
fn test_toasts_expire_and_are_capped() {
    let mut model = create_test_model();
    for i in 0..5 {
        model.show_toast(ToastLevel::Info, format!("toast {i}"));
    }
    let visible = toasts(&model);
    assert_eq!(visible.len(), 3);
    assert_eq!(visible[0].0, "toast 2");

    assert!(!model.expire_toasts(Instant::now()));
    assert!(model.expire_toasts(Instant::now() + Duration::from_secs(4)));
    assert!(toasts(&model).is_empty());
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

// Event loop helpers

#[test]
fn test_debouncer_waits_for_quiet_period() {
    let mut debouncer = Debouncer::new(100);
    debouncer.queue((120_u16, 40_u16), 0);

    assert!(debouncer.take_ready(50).is_none());
    assert_eq!(debouncer.take_ready(100), Some((120, 40)));
    assert!(!debouncer.is_pending());
}

#[test]
fn test_debouncer_requeue_restarts_delay() {
    let mut debouncer = Debouncer::new(150);
    debouncer.queue((), 0);
    debouncer.queue((), 100);

    assert!(debouncer.take_ready(200).is_none());
    assert!(debouncer.take_ready(250).is_some());
}

#[test]
fn test_debouncer_cancel() {
    let mut debouncer = Debouncer::new(10);
    debouncer.queue((), 0);
    debouncer.cancel();
    assert!(debouncer.take_ready(100).is_none());
}

#[test]
fn test_text_edits_restart_render_delay() {
    assert!(is_text_edit(&Message::InsertChar('a')));
    assert!(is_text_edit(&Message::DeleteBack));
    assert!(!is_text_edit(&Message::MoveHome));
    assert!(!is_text_edit(&Message::ScrollPane(Pane::Source, 1)));
}

// Input mapping

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn wheel(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_keys_map_to_messages() {
    let model = create_test_model();
    let cases = [
        (key(KeyCode::Char('q'), KeyModifiers::CONTROL), Message::Quit),
        (key(KeyCode::Char('a'), KeyModifiers::NONE), Message::InsertChar('a')),
        (key(KeyCode::Enter, KeyModifiers::NONE), Message::InsertNewline),
        (key(KeyCode::F(1), KeyModifiers::NONE), Message::ToggleHelp),
        (key(KeyCode::F(4), KeyModifiers::NONE), Message::SetViewMode(ViewMode::Preview)),
        (key(KeyCode::Char('g'), KeyModifiers::CONTROL), Message::OpenEnhanceMenu),
        (key(KeyCode::Char('o'), KeyModifiers::CONTROL), Message::StartImport),
        (key(KeyCode::Char('s'), KeyModifiers::CONTROL), Message::Export),
        (key(KeyCode::Char('p'), KeyModifiers::CONTROL), Message::Print),
        (key(KeyCode::Char('l'), KeyModifiers::CONTROL), Message::ClearDocument),
        (key(KeyCode::Left, KeyModifiers::CONTROL), Message::MoveWordLeft),
        (
            key(KeyCode::Down, KeyModifiers::ALT),
            Message::ScrollPane(Pane::Rendered, 1),
        ),
        (
            key(KeyCode::Tab, KeyModifiers::NONE),
            Message::InsertText("    ".to_string()),
        ),
    ];
    for (event, expected) in cases {
        assert_eq!(App::handle_key(event, &model), Some(expected), "{event:?}");
    }
}

#[test]
fn test_help_swallows_keys() {
    let mut model = create_test_model();
    model.help_visible = true;
    assert_eq!(
        App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model),
        Some(Message::HideHelp)
    );
}

#[test]
fn test_enhance_menu_number_keys() {
    let mut model = create_test_model();
    model.enhance_menu = Some(0);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('2'), KeyModifiers::NONE), &model),
        Some(Message::Enhance(TransformKind::Funky))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::CloseEnhanceMenu)
    );
}

#[test]
fn test_import_prompt_collects_path() {
    let mut model = create_test_model();
    model.import_prompt = Some("notes.m".to_string());
    assert_eq!(
        App::handle_key(key(KeyCode::Char('d'), KeyModifiers::NONE), &model),
        Some(Message::ImportInput("notes.md".to_string()))
    );
    model.import_prompt = Some("notes.md".to_string());
    assert_eq!(
        App::handle_key(key(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::ImportFile("notes.md".into()))
    );
}

#[test]
fn test_wheel_over_content_scrolls_pane() {
    let model = create_long_test_model();
    assert_eq!(
        App::handle_mouse(wheel(MouseEventKind::ScrollDown, 70, 5), &model),
        Some(Message::ScrollPane(Pane::Rendered, 3))
    );
    assert_eq!(
        App::handle_mouse(wheel(MouseEventKind::ScrollUp, 20, 5), &model),
        Some(Message::ScrollPane(Pane::Source, -3))
    );
}

#[test]
fn test_wheel_over_pane_border_is_forwarded() {
    let model = create_long_test_model();
    assert_eq!(
        App::handle_mouse(wheel(MouseEventKind::ScrollDown, 70, 0), &model),
        Some(Message::ForwardWheel(Pane::Rendered, 3))
    );
}

#[test]
fn test_click_in_source_moves_cursor() {
    let model = create_long_test_model();
    // 199 lines: border column plus a 3 digit gutter and a space
    let click = wheel(
        MouseEventKind::Down(crossterm::event::MouseButton::Left),
        10,
        3,
    );
    assert_eq!(
        App::handle_mouse(click, &model),
        Some(Message::MoveCursorTo(2, 5))
    );
}
