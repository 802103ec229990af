//! Background diagram rendering.
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use super::{DiagramAttempt, DiagramEngine, DiagramError};

/// Result of one attempt, tagged with the slot and generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOutcome {
    pub slot: usize,
    pub generation: u64,
    pub result: Result<String, DiagramError>,
}

/// Runs attempts on their own threads and collects outcomes over a channel.
pub struct DiagramWorker {
    engine: Arc<dyn DiagramEngine>,
    tx: Sender<DiagramOutcome>,
    rx: Receiver<DiagramOutcome>,
}

impl DiagramWorker {
    pub fn new(engine: Arc<dyn DiagramEngine>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { engine, tx, rx }
    }

    /// Start rendering an attempt. Attempts cancelled before the thread runs
    /// never reach the engine and report nothing.
    pub fn submit(&self, attempt: DiagramAttempt) {
        let engine = Arc::clone(&self.engine);
        let tx = self.tx.clone();
        let name = format!("diagram-{}", attempt.slot);
        let spawned = std::thread::Builder::new().name(name).spawn(move || {
            if attempt.token.is_cancelled() {
                return;
            }
            let result = engine.render(&attempt.request);
            if attempt.token.is_cancelled() {
                return;
            }
            let _ = tx.send(DiagramOutcome {
                slot: attempt.slot,
                generation: attempt.token.generation(),
                result,
            });
        });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn diagram thread");
        }
    }

    /// Finished outcomes, without blocking.
    pub fn drain(&self) -> Vec<DiagramOutcome> {
        self.rx.try_iter().collect()
    }

    /// Block for the next outcome, up to `timeout`.
    pub fn wait(&self, timeout: Duration) -> Option<DiagramOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}
