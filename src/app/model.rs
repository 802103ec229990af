use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::ViewMode;
use crate::diagram::{Applied, DiagramAttempt, DiagramOutcome, DiagramSet};
use crate::document::{RenderedLine, VisualTree};
use crate::editor::DocumentBuffer;
use crate::enhance::{EnhanceOutcome, TransformKind};
use crate::sync::{Pane, ScrollSync, SyncOutcome};
use crate::ui::viewport::Viewport;

use super::Message;

/// Document shown when no file is given.
pub const DEFAULT_DOCUMENT: &str = include_str!("welcome.md");

const TOAST_DURATION: Duration = Duration::from_secs(3);
const MAX_TOASTS: usize = 3;
/// Preview width used when printing while the preview is hidden.
pub const PRINT_WIDTH: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// An enhancement call waiting to be handed to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceJob {
    pub revision: u64,
    pub kind: TransformKind,
    pub content: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The markdown source being edited
    pub editor: DocumentBuffer,
    /// Scroll state of the source pane
    pub source_view: Viewport,
    /// Scroll state of the preview pane
    pub preview_view: Viewport,
    /// Last rendered tree of the document
    pub tree: VisualTree,
    /// `tree` laid out at the preview width
    pub preview_lines: Vec<RenderedLine>,
    pub diagrams: DiagramSet,
    pub scroll_sync: ScrollSync,
    /// Mode the user asked for
    pub preferred_view: ViewMode,
    /// Mode on screen; `Edit` replaces `Split` on narrow terminals
    pub view_mode: ViewMode,
    pub terminal_size: (u16, u16),
    /// Name shown in the status bar
    pub file_label: String,
    pub export_dir: PathBuf,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    /// Selected row while the enhance menu is open
    pub enhance_menu: Option<usize>,
    /// Path being typed while the import prompt is open
    pub import_prompt: Option<String>,
    /// Transform currently in flight
    pub enhancing: Option<TransformKind>,
    /// Bumped whenever the document is replaced wholesale
    pub revision: u64,
    /// An edit happened and the preview is out of date
    pub render_pending: bool,
    toasts: Vec<Toast>,
    pending_attempts: Vec<DiagramAttempt>,
    pending_enhance: Option<EnhanceJob>,
    pending_messages: VecDeque<Message>,
    pub should_quit: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_label", &self.file_label)
            .field("view_mode", &self.view_mode)
            .field("revision", &self.revision)
            .field("enhancing", &self.enhancing)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new("", (80, 24), ViewMode::Split, DiagramSet::default())
    }
}

impl Model {
    /// Build the model and render `text` once.
    pub fn new(
        text: &str,
        terminal_size: (u16, u16),
        view_mode: ViewMode,
        diagrams: DiagramSet,
    ) -> Self {
        let mut model = Self {
            editor: DocumentBuffer::from_text(text),
            source_view: Viewport::new(0, 0, 0),
            preview_view: Viewport::new(0, 0, 0),
            tree: VisualTree::default(),
            preview_lines: Vec::new(),
            diagrams,
            scroll_sync: ScrollSync::new(),
            preferred_view: view_mode,
            view_mode,
            terminal_size,
            file_label: "untitled.md".to_string(),
            export_dir: PathBuf::from("."),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            enhance_menu: None,
            import_prompt: None,
            enhancing: None,
            revision: 0,
            render_pending: false,
            toasts: Vec::new(),
            pending_attempts: Vec::new(),
            pending_enhance: None,
            pending_messages: VecDeque::new(),
            should_quit: false,
        };
        model.apply_layout();
        model.rerender();
        model
    }

    #[must_use]
    pub fn with_file_label(mut self, label: impl Into<String>) -> Self {
        self.file_label = label.into();
        self
    }

    /// Recompute pane sizes from the terminal size and view mode.
    pub fn apply_layout(&mut self) {
        let (width, height) = self.terminal_size;
        let narrow = width < crate::ui::NARROW_WIDTH;
        self.view_mode = if self.preferred_view == ViewMode::Split && narrow {
            ViewMode::Edit
        } else {
            self.preferred_view
        };

        let areas = crate::ui::pane_areas(Rect::new(0, 0, width, height), self.view_mode);
        let line_count = self.editor.line_count();
        let source = areas
            .source
            .map(|outer| crate::ui::source_content_area(outer, line_count))
            .unwrap_or_default();
        self.source_view.resize(source.width, source.height);
        self.source_view.set_total_lines(line_count);

        let preview_before = self.preview_view.width();
        let preview = areas
            .preview
            .map(crate::ui::preview_content_area)
            .unwrap_or_default();
        self.preview_view.resize(preview.width, preview.height);
        if preview.width != preview_before {
            self.relayout();
        }
    }

    /// Render the document and reconcile diagram slots with the new tree.
    pub fn rerender(&mut self) {
        let _scope = tracing::info_span!(target: "perf", "model.rerender").entered();
        let text = self.editor.text();
        self.tree = crate::document::render(&text);
        let attempts = self.diagrams.reconcile(&self.tree.diagrams());
        self.pending_attempts.extend(attempts);
        self.render_pending = false;
        self.relayout();
    }

    /// Lay out the current tree at the preview width.
    pub fn relayout(&mut self) {
        let width = self.preview_view.width();
        if width == 0 {
            self.preview_lines.clear();
            self.preview_view.set_total_lines(0);
            return;
        }
        self.diagrams.ensure_rasters(width);
        self.preview_lines = crate::document::layout(&self.tree, &self.diagrams, width);
        self.preview_view.set_total_lines(self.preview_lines.len());
        crate::debug_log::record(
            "preview.layout",
            format!("width={width} lines={}", self.preview_lines.len()),
        );
    }

    /// Bookkeeping after any buffer edit or cursor move.
    pub(super) fn after_edit(&mut self, changed_text: bool) {
        if changed_text {
            self.render_pending = true;
        }
        self.source_view.set_total_lines(self.editor.line_count());
        if self.source_view.ensure_visible(self.editor.cursor().line) {
            self.on_pane_scrolled(Pane::Source);
        }
    }

    /// Run the synchronizer for a scroll that happened in `origin`.
    ///
    /// A successful write moves the other pane, which reports its own scroll
    /// back through [`Message::PaneScrolled`]; the lock swallows that echo.
    pub fn on_pane_scrolled(&mut self, origin: Pane) {
        if self.view_mode != ViewMode::Split {
            return;
        }
        let outcome = self.scroll_sync.on_scroll(
            origin,
            &mut self.source_view,
            &mut self.preview_view,
        );
        if let SyncOutcome::Synced {
            target,
            changed: true,
            ..
        } = outcome
        {
            self.pending_messages.push_back(Message::PaneScrolled(target));
        }
    }

    pub const fn viewport(&self, pane: Pane) -> &Viewport {
        match pane {
            Pane::Source => &self.source_view,
            Pane::Rendered => &self.preview_view,
        }
    }

    pub fn viewport_mut(&mut self, pane: Pane) -> &mut Viewport {
        match pane {
            Pane::Source => &mut self.source_view,
            Pane::Rendered => &mut self.preview_view,
        }
    }

    /// Replace the whole document, invalidating any enhancement in flight.
    pub fn replace_document(&mut self, text: &str) {
        self.editor.replace_text(text);
        self.revision += 1;
        self.source_view.go_to_line(0);
        self.preview_view.go_to_line(0);
        self.apply_layout();
        self.rerender();
    }

    pub fn apply_diagram_outcome(&mut self, outcome: DiagramOutcome) {
        if self.diagrams.apply(outcome) == Applied::Applied {
            self.relayout();
        }
    }

    /// Queue an enhancement of the current document.
    pub fn request_enhancement(&mut self, kind: TransformKind) {
        self.enhance_menu = None;
        if self.enhancing.is_some() {
            self.show_toast(ToastLevel::Info, "An enhancement is already running");
            return;
        }
        let content = self.editor.text();
        if content.trim().is_empty() {
            return;
        }
        tracing::info!(kind = kind.label(), revision = self.revision, "enhancement issued");
        self.enhancing = Some(kind);
        self.pending_enhance = Some(EnhanceJob {
            revision: self.revision,
            kind,
            content,
        });
    }

    pub fn apply_enhance_outcome(&mut self, outcome: EnhanceOutcome) {
        self.enhancing = None;
        if outcome.revision != self.revision {
            tracing::debug!(
                started = outcome.revision,
                current = self.revision,
                "stale enhancement result discarded"
            );
            return;
        }
        match outcome.result {
            Ok(text) => {
                self.replace_document(&text);
                self.show_toast(ToastLevel::Success, "Magic applied! ✨");
            }
            Err(err) => {
                tracing::info!(kind = outcome.kind.label(), error = %err, "enhancement failed");
                self.show_toast(
                    ToastLevel::Error,
                    format!("Oops! Failed to enhance content: {err}"),
                );
            }
        }
    }

    /// Import `path`, replacing the document on success.
    pub fn import_path(&mut self, path: &Path) {
        match crate::files::import_file(path) {
            Ok(text) => {
                self.file_label = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
                self.replace_document(&text);
                self.show_toast(ToastLevel::Success, "File loaded successfully!");
            }
            Err(err) => {
                tracing::info!(path = %path.display(), error = %err, "import rejected");
                self.show_toast(ToastLevel::Error, err.user_message());
            }
        }
    }

    pub fn export_document(&mut self) {
        match crate::files::export_document(&self.export_dir, &self.editor.text()) {
            Ok(path) => {
                self.show_toast(
                    ToastLevel::Success,
                    format!("Downloaded successfully! ({})", path.display()),
                );
            }
            Err(err) => {
                tracing::info!(error = %err, "export failed");
                self.show_toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    /// Print the preview to a text file. A hidden preview is laid out at
    /// [`PRINT_WIDTH`] columns.
    pub fn print_preview(&mut self) {
        if self.render_pending {
            self.rerender();
        }
        let width = match self.preview_view.width() {
            0 => PRINT_WIDTH,
            width => width,
        };
        self.diagrams.ensure_rasters(width);
        let lines = crate::document::layout(&self.tree, &self.diagrams, width);
        match crate::files::print_preview(&self.export_dir, &lines) {
            Ok(path) => {
                self.show_toast(ToastLevel::Success, format!("Printed to {}", path.display()));
            }
            Err(err) => {
                tracing::info!(error = %err, "print failed");
                self.show_toast(ToastLevel::Error, err.to_string());
            }
        }
    }

    /// Diagram attempts issued since the last call.
    pub fn take_pending_attempts(&mut self) -> Vec<DiagramAttempt> {
        std::mem::take(&mut self.pending_attempts)
    }

    pub fn take_pending_enhance(&mut self) -> Option<EnhanceJob> {
        self.pending_enhance.take()
    }

    pub fn take_pending_messages(&mut self) -> Vec<Message> {
        self.pending_messages.drain(..).collect()
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        if self.toasts.len() >= MAX_TOASTS {
            self.toasts.remove(0);
        }
        self.toasts.push(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    /// Drop expired toasts. Returns whether any were removed.
    pub fn expire_toasts(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        self.toasts.len() != before
    }

    /// Visible toasts, oldest first.
    pub fn active_toasts(&self) -> impl Iterator<Item = (&str, ToastLevel)> {
        self.toasts
            .iter()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}
