use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::effects::Workers;
use crate::app::{App, DEFAULT_DOCUMENT, Message, Model, RENDER_DEBOUNCE_MS, ToastLevel, update};
use crate::diagram::DiagramSet;

const RESIZE_DEBOUNCE_MS: u64 = 100;

/// Cap on echo messages fed back per dispatch.
const MAX_FEEDBACK: usize = 8;

/// Holds the latest value until it has been quiet for `delay_ms`.
pub(super) struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T: Copy> Debouncer<T> {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Queue `value`, restarting the quiet period.
    pub(super) fn queue(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (value, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some(value)
        } else {
            None
        }
    }

    pub(super) fn cancel(&mut self) {
        self.pending = None;
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Messages that change the buffer text and so restart the render delay.
pub(super) const fn is_text_edit(msg: &Message) -> bool {
    matches!(
        msg,
        Message::InsertChar(_)
            | Message::InsertText(_)
            | Message::InsertNewline
            | Message::DeleteBack
            | Message::DeleteForward
    )
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = tracing::info_span!(target: "perf", "app.run.total").entered();

        let read_scope = tracing::info_span!(target: "perf", "app.read_file").entered();
        let (text, label) = match &self.file_path {
            Some(path) => {
                let text = crate::files::import_file(path)
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                let label = path.file_name().map_or_else(
                    || path.display().to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
                (text, label)
            }
            None => (DEFAULT_DOCUMENT.to_string(), "untitled.md".to_string()),
        };
        drop(read_scope);

        let init_scope = tracing::info_span!(target: "perf", "app.ratatui_init").entered();
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: splitmark requires an interactive terminal")?;
        super::set_terminal_owned(true);
        let size = match terminal.size() {
            Ok(size) => size,
            Err(err) => {
                ratatui::restore();
                super::set_terminal_owned(false);
                return Err(err.into());
            }
        };
        drop(init_scope);
        crate::debug_log::record(
            "init.layout",
            format!("terminal={}x{} view={}", size.width, size.height, self.view_mode.as_str()),
        );

        let diagrams = DiagramSet::new(self.diagrams_enabled, self.diagram_theme);
        let mut model = Model::new(&text, (size.width, size.height), self.view_mode, diagrams)
            .with_file_label(label);
        model.export_dir.clone_from(&self.export_dir);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        if self.view_mode == crate::config::ViewMode::Split && model.view_mode != self.view_mode {
            model.show_toast(ToastLevel::Info, "Narrow terminal: showing the editor only");
        }

        let workers = Workers::new(self);
        let result = Self::event_loop(&mut terminal, &mut model, &workers);

        model.diagrams.cancel_all();
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
        ratatui::restore();
        super::set_terminal_owned(false);

        result
    }

    /// Update the model, run side effects, then feed back any echo messages.
    pub(super) fn dispatch(model: &mut Model, workers: &Workers, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, workers, &side_msg);
        for _ in 0..MAX_FEEDBACK {
            let feedback = model.take_pending_messages();
            if feedback.is_empty() {
                break;
            }
            for msg in feedback {
                *model = update(std::mem::take(model), msg);
            }
        }
    }

    fn event_loop(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        workers: &Workers,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = Debouncer::<(u16, u16)>::new(RESIZE_DEBOUNCE_MS);
        let mut render_debouncer = Debouncer::<()>::new(RENDER_DEBOUNCE_MS);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        Self::dispatch_work(model, workers);

        loop {
            if model.expire_toasts(Instant::now()) {
                needs_render = true;
            }

            for msg in workers.drain() {
                crate::debug_log::record(
                    "worker.message",
                    format!("frame={frame_idx} msg={msg:?}"),
                );
                Self::dispatch(model, workers, msg);
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::debug_log::record(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                Self::dispatch(model, workers, Message::Resize(width, height));
                needs_render = true;
            }

            if render_debouncer.take_ready(now_ms).is_some() && model.render_pending {
                Self::dispatch(model, workers, Message::RenderPreview);
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() || render_debouncer.is_pending() {
                10
            } else if model.enhancing.is_some() || model.diagrams.has_pending() {
                50
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts into a single render.
                let mut handled = 0_u32;
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        handled += 1;
                        if is_text_edit(&msg) {
                            render_debouncer.queue((), event_ms);
                        }
                        if matches!(msg, Message::RenderPreview | Message::ClearDocument) {
                            render_debouncer.cancel();
                        }
                        Self::dispatch(model, workers, msg);
                        needs_render = true;
                    }
                    if !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
                if handled > 1 {
                    crate::debug_log::record(
                        "event.drain",
                        format!("frame={frame_idx} drained={handled}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::debug_log::record(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} source={} preview={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.source_view.offset(),
                        model.preview_view.offset()
                    ),
                );
                *model = update(std::mem::take(model), Message::FrameBoundary);
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
