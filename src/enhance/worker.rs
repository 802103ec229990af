use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use super::{EnhanceError, Enhancer, TransformKind};

/// Result of one enhancement call, tagged with the document revision it was
/// started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceOutcome {
    pub revision: u64,
    pub kind: TransformKind,
    pub result: Result<String, EnhanceError>,
}

/// Runs enhancement calls on a background thread.
pub struct EnhanceWorker {
    enhancer: Arc<dyn Enhancer>,
    tx: Sender<EnhanceOutcome>,
    rx: Receiver<EnhanceOutcome>,
}

impl EnhanceWorker {
    pub fn new(enhancer: Arc<dyn Enhancer>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { enhancer, tx, rx }
    }

    pub fn submit(&self, revision: u64, kind: TransformKind, content: String) {
        let enhancer = Arc::clone(&self.enhancer);
        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name("enhance".to_string())
            .spawn(move || {
                let result = enhancer.enhance(&content, kind);
                let _ = tx.send(EnhanceOutcome {
                    revision,
                    kind,
                    result,
                });
            });
        if let Err(err) = spawned {
            tracing::warn!(error = %err, "failed to spawn enhance thread");
            let _ = self.tx.send(EnhanceOutcome {
                revision,
                kind,
                result: Err(EnhanceError::Transport(err.to_string())),
            });
        }
    }

    pub fn drain(&self) -> Vec<EnhanceOutcome> {
        self.rx.try_iter().collect()
    }

    pub fn wait(&self, timeout: Duration) -> Option<EnhanceOutcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}
