//! Mermaid diagram lifecycle.
//!
//! Every `mermaid` fence in the document owns a [`DiagramBlock`]. When its
//! source changes the block starts a new attempt: a fresh render id, a bumped
//! generation and a new cancellation flag. Rendering happens on a worker
//! thread ([`DiagramWorker`]); a result is applied only if its generation is
//! still the block's current one, so output for superseded source never
//! reaches the screen.

mod engine;
mod raster;
mod worker;

pub use engine::{
    DiagramEngine, DiagramError, DiagramRequest, DiagramTheme, MermaidCli, SecurityLevel,
};
pub use raster::{HalfCell, Raster, rasterize};
pub use worker::{DiagramOutcome, DiagramWorker};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Placeholder shown while an attempt is in flight.
pub const PLACEHOLDER_TEXT: &str = "Rendering diagram…";

/// Fixed label of the inline error box.
pub const ERROR_LABEL: &str = "MERMAID ERROR";

/// Rasters are never taller than this many terminal rows.
pub const MAX_RASTER_ROWS: usize = 40;

/// Rendering state of one diagram block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramState {
    /// Whitespace-only source. Displays nothing.
    Blank,
    Pending,
    Rendered { svg: String },
    Failed { message: String },
}

/// Identifies one render attempt and lets it be abandoned.
#[derive(Debug, Clone)]
pub struct AttemptToken {
    generation: u64,
    cancelled: Arc<AtomicBool>,
}

impl AttemptToken {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Work order for the diagram worker.
#[derive(Debug, Clone)]
pub struct DiagramAttempt {
    pub slot: usize,
    pub token: AttemptToken,
    pub request: DiagramRequest,
}

#[derive(Debug)]
pub struct DiagramBlock {
    source: String,
    render_id: String,
    token: Option<AttemptToken>,
    state: DiagramState,
    raster: Option<(u16, Option<Raster>)>,
}

impl DiagramBlock {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn render_id(&self) -> &str {
        &self.render_id
    }

    pub const fn state(&self) -> &DiagramState {
        &self.state
    }

    /// Generation of the current attempt, if one was issued.
    pub fn generation(&self) -> Option<u64> {
        self.token.as_ref().map(AttemptToken::generation)
    }
}

/// Whether a worker outcome was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// What the preview should draw for one diagram slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramDisplay<'a> {
    /// Diagram rendering is switched off; show the fence as code.
    Disabled,
    Blank,
    Pending,
    Failed { message: &'a str },
    /// `raster` is `None` when the SVG could not be rasterized.
    Rendered { raster: Option<&'a Raster> },
}

/// All diagram blocks of the current document, indexed by slot.
#[derive(Debug)]
pub struct DiagramSet {
    blocks: Vec<DiagramBlock>,
    next_generation: u64,
    enabled: bool,
    theme: DiagramTheme,
}

impl Default for DiagramSet {
    fn default() -> Self {
        Self::new(true, DiagramTheme::default())
    }
}

impl DiagramSet {
    pub const fn new(enabled: bool, theme: DiagramTheme) -> Self {
        Self {
            blocks: Vec::new(),
            next_generation: 0,
            enabled,
            theme,
        }
    }

    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, slot: usize) -> Option<&DiagramBlock> {
        self.blocks.get(slot)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Match blocks to the diagram slots of a freshly rendered tree.
    ///
    /// Slots whose source is unchanged keep their state. Changed slots cancel
    /// their previous attempt and start a new one, returned for submission.
    /// Slots that disappeared are cancelled and dropped.
    pub fn reconcile(&mut self, slots: &[(usize, &str)]) -> Vec<DiagramAttempt> {
        if !self.enabled {
            self.cancel_all();
            self.blocks.clear();
            return Vec::new();
        }

        for stale in self.blocks.iter().skip(slots.len()) {
            if let Some(token) = &stale.token {
                token.cancel();
            }
        }
        self.blocks.truncate(slots.len());

        let mut attempts = Vec::new();
        for &(slot, source) in slots {
            if let Some(block) = self.blocks.get(slot)
                && block.source == source
            {
                continue;
            }
            let (block, attempt) = self.start_block(slot, source);
            if let Some(existing) = self.blocks.get_mut(slot) {
                if let Some(token) = &existing.token {
                    token.cancel();
                }
                *existing = block;
            } else {
                self.blocks.push(block);
            }
            attempts.extend(attempt);
        }
        attempts
    }

    fn start_block(&mut self, slot: usize, source: &str) -> (DiagramBlock, Option<DiagramAttempt>) {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            let block = DiagramBlock {
                source: source.to_string(),
                render_id: String::new(),
                token: None,
                state: DiagramState::Blank,
                raster: None,
            };
            return (block, None);
        }

        self.next_generation += 1;
        let token = AttemptToken::new(self.next_generation);
        let render_id = format!("diagram-{}", uuid::Uuid::new_v4().simple());
        let request = DiagramRequest::new(render_id.clone(), trimmed, self.theme);
        tracing::debug!(
            slot,
            generation = token.generation(),
            render_id = %render_id,
            "diagram attempt issued"
        );
        crate::debug_log::record(
            "diagram.attempt",
            format!("slot={slot} generation={}", token.generation()),
        );

        let block = DiagramBlock {
            source: source.to_string(),
            render_id,
            token: Some(token.clone()),
            state: DiagramState::Pending,
            raster: None,
        };
        let attempt = DiagramAttempt {
            slot,
            token,
            request,
        };
        (block, Some(attempt))
    }

    /// Apply a worker outcome if it belongs to the block's current attempt.
    pub fn apply(&mut self, outcome: DiagramOutcome) -> Applied {
        let Some(block) = self.blocks.get_mut(outcome.slot) else {
            tracing::debug!(slot = outcome.slot, "diagram result for removed slot discarded");
            return Applied::Stale;
        };
        if block.generation() != Some(outcome.generation) {
            tracing::debug!(
                slot = outcome.slot,
                generation = outcome.generation,
                "stale diagram result discarded"
            );
            return Applied::Stale;
        }

        block.state = match outcome.result {
            Ok(svg) if svg.trim().is_empty() => DiagramState::Failed {
                message: DiagramError::EmptyOutput.to_string(),
            },
            Ok(svg) => DiagramState::Rendered { svg },
            Err(err) => DiagramState::Failed {
                message: err.to_string(),
            },
        };
        block.raster = None;
        tracing::debug!(
            slot = outcome.slot,
            generation = outcome.generation,
            failed = matches!(block.state, DiagramState::Failed { .. }),
            "diagram resolved"
        );
        Applied::Applied
    }

    /// Rasterize rendered blocks for the given pane width. Cached per block
    /// and width, so repeated calls are cheap.
    pub fn ensure_rasters(&mut self, width: u16) {
        for (slot, block) in self.blocks.iter_mut().enumerate() {
            let DiagramState::Rendered { svg } = &block.state else {
                continue;
            };
            if block.raster.as_ref().is_some_and(|(w, _)| *w == width) {
                continue;
            }
            let _scope = tracing::info_span!(target: "perf", "diagram.rasterize").entered();
            let raster = match rasterize(svg, width, MAX_RASTER_ROWS) {
                Ok(raster) => Some(raster),
                Err(err) => {
                    tracing::debug!(slot, error = %err, "diagram rasterization failed");
                    None
                }
            };
            block.raster = Some((width, raster));
        }
    }

    pub fn display(&self, slot: usize, source: &str) -> DiagramDisplay<'_> {
        if !self.enabled {
            return DiagramDisplay::Disabled;
        }
        let Some(block) = self.blocks.get(slot).filter(|b| b.source == source) else {
            return if source.trim().is_empty() {
                DiagramDisplay::Blank
            } else {
                DiagramDisplay::Pending
            };
        };
        match &block.state {
            DiagramState::Blank => DiagramDisplay::Blank,
            DiagramState::Pending => DiagramDisplay::Pending,
            DiagramState::Failed { message } => DiagramDisplay::Failed { message },
            DiagramState::Rendered { .. } => DiagramDisplay::Rendered {
                raster: block.raster.as_ref().and_then(|(_, r)| r.as_ref()),
            },
        }
    }

    /// Whether any block is waiting on the worker.
    pub fn has_pending(&self) -> bool {
        self.blocks
            .iter()
            .any(|block| block.state == DiagramState::Pending)
    }

    /// Cancel every in-flight attempt.
    pub fn cancel_all(&self) {
        for block in &self.blocks {
            if let Some(token) = &block.token {
                token.cancel();
            }
        }
    }
}
