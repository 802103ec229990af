use std::sync::Arc;
use std::time::Duration;

use splitmark::app::{Message, Model, update};
use splitmark::config::ViewMode;
use splitmark::diagram::{DiagramSet, DiagramTheme};
use splitmark::document::{LineType, VisualNode, layout, render};
use splitmark::enhance::{EnhanceError, EnhanceWorker, Enhancer, TransformKind};
use splitmark::files::{EXPORT_FILE_NAME, export_document, import_file};
use splitmark::sync::{Pane, ScrollSync, SyncOutcome};
use splitmark::ui::viewport::Viewport;

struct Echo;

impl Enhancer for Echo {
    fn enhance(&self, content: &str, kind: TransformKind) -> Result<String, EnhanceError> {
        Ok(format!("{}: {content}", kind.label()))
    }
}

#[test]
fn test_markdown_renders_to_styled_lines() {
    let tree = render("# Title\n\nSome *body* text.\n\n- one\n- two\n");
    assert!(matches!(tree.nodes[0], VisualNode::Heading { level: 1, .. }));

    let lines = layout(&tree, &DiagramSet::default(), 40);
    let heading = lines
        .iter()
        .find(|line| line.content().contains("Title"))
        .unwrap();
    assert_eq!(heading.line_type(), &LineType::Heading(1));
    assert!(lines.iter().any(|line| line.content().contains("Some body text.")));
    assert!(
        lines
            .iter()
            .filter(|line| matches!(line.line_type(), LineType::ListItem(_)))
            .count()
            >= 2
    );
}

#[test]
fn test_proportional_sync_between_viewports() {
    let mut source = Viewport::new(40, 10, 110);
    let mut preview = Viewport::new(40, 10, 210);
    let mut sync = ScrollSync::new();

    source.go_to_line(50);
    let outcome = sync.on_scroll(Pane::Source, &mut source, &mut preview);
    assert!(matches!(
        outcome,
        SyncOutcome::Synced {
            target: Pane::Rendered,
            changed: true,
            ..
        }
    ));
    assert_eq!(preview.offset(), 100);

    // The write to the preview comes back as a preview scroll event.
    assert_eq!(
        sync.on_scroll(Pane::Rendered, &mut source, &mut preview),
        SyncOutcome::Suppressed
    );
    sync.on_frame();

    preview.go_to_line(200);
    sync.on_scroll(Pane::Rendered, &mut source, &mut preview);
    assert_eq!(source.offset(), 100);
}

#[test]
fn test_import_edit_export_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("draft.md");
    std::fs::write(&input, "# Draft\n\nfirst line").unwrap();

    let text = import_file(&input).unwrap();
    let model = Model::new(
        &text,
        (120, 30),
        ViewMode::Split,
        DiagramSet::new(false, DiagramTheme::Default),
    );
    let model = update(model, Message::MoveToEnd);
    let model = update(model, Message::InsertText("\nsecond line".to_string()));
    let model = update(model, Message::RenderPreview);

    assert!(
        model
            .preview_lines
            .iter()
            .any(|line| line.content().contains("second line"))
    );

    let out = export_document(dir.path(), &model.editor.text()).unwrap();
    assert_eq!(out, dir.path().join(EXPORT_FILE_NAME));
    assert_eq!(
        std::fs::read_to_string(out).unwrap(),
        "# Draft\n\nfirst line\nsecond line"
    );
}

#[test]
fn test_enhancement_applies_through_worker() {
    let worker = EnhanceWorker::new(Arc::new(Echo));
    let mut model = Model::new(
        "hello",
        (120, 30),
        ViewMode::Split,
        DiagramSet::new(false, DiagramTheme::Default),
    );

    model = update(model, Message::Enhance(TransformKind::Summarize));
    let job = model.take_pending_enhance().unwrap();
    worker.submit(job.revision, job.kind, job.content);
    let outcome = worker.wait(Duration::from_secs(5)).unwrap();
    let model = update(model, Message::EnhanceFinished(outcome));

    assert_eq!(model.editor.text(), "Summarize: hello");
    assert_eq!(model.revision, 1);
}
