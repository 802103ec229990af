use crate::app::{App, Message, Model};
use crate::diagram::DiagramWorker;
use crate::enhance::EnhanceWorker;

/// Background workers owned by the event loop.
pub(super) struct Workers {
    pub(super) diagrams: DiagramWorker,
    pub(super) enhance: EnhanceWorker,
}

impl Workers {
    pub(super) fn new(app: &App) -> Self {
        Self {
            diagrams: DiagramWorker::new(std::sync::Arc::clone(&app.diagram_engine)),
            enhance: EnhanceWorker::new(std::sync::Arc::clone(&app.enhancer)),
        }
    }

    /// Finished background work, as messages for `update`.
    pub(super) fn drain(&self) -> Vec<Message> {
        let diagrams = self.diagrams.drain().into_iter().map(Message::DiagramResolved);
        let enhance = self.enhance.drain().into_iter().map(Message::EnhanceFinished);
        diagrams.chain(enhance).collect()
    }
}

impl App {
    pub(super) fn handle_message_side_effects(model: &mut Model, workers: &Workers, msg: &Message) {
        match msg {
            Message::ImportFile(path) => model.import_path(path),
            Message::Export => model.export_document(),
            Message::Print => model.print_preview(),
            _ => {}
        }
        Self::dispatch_work(model, workers);
    }

    /// Hand queued diagram attempts and enhancement jobs to the workers.
    pub(super) fn dispatch_work(model: &mut Model, workers: &Workers) {
        for attempt in model.take_pending_attempts() {
            crate::debug_log::record(
                "diagram.submit",
                format!("slot={} id={}", attempt.slot, attempt.request.render_id),
            );
            workers.diagrams.submit(attempt);
        }
        if let Some(job) = model.take_pending_enhance() {
            workers.enhance.submit(job.revision, job.kind, job.content);
        }
    }
}
