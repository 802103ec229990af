//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{DEFAULT_DOCUMENT, EnhanceJob, Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ViewMode;
use crate::diagram::{DiagramEngine, DiagramTheme, MermaidCli};
use crate::enhance::{Enhancer, GeminiEnhancer};

/// Delay between the last edit and the preview re-render.
pub const RENDER_DEBOUNCE_MS: u64 = 150;

static TERMINAL_OWNED: AtomicBool = AtomicBool::new(false);

/// True while the TUI holds the alternate screen. Log writers that share the
/// tty stay quiet in that window.
pub fn terminal_owned() -> bool {
    TERMINAL_OWNED.load(Ordering::Relaxed)
}

fn set_terminal_owned(owned: bool) {
    TERMINAL_OWNED.store(owned, Ordering::Relaxed);
}

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    view_mode: ViewMode,
    export_dir: PathBuf,
    diagrams_enabled: bool,
    diagram_theme: DiagramTheme,
    diagram_engine: Arc<dyn DiagramEngine>,
    enhancer: Arc<dyn Enhancer>,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create an application editing `file_path`, or the welcome document
    /// when `None`.
    pub fn new(file_path: Option<PathBuf>) -> Self {
        Self {
            file_path,
            view_mode: ViewMode::Split,
            export_dir: PathBuf::from("."),
            diagrams_enabled: true,
            diagram_theme: DiagramTheme::default(),
            diagram_engine: Arc::new(MermaidCli::default()),
            enhancer: Arc::new(GeminiEnhancer::from_env()),
            config_global_path: None,
            config_local_path: None,
        }
    }

    #[must_use]
    pub const fn with_view_mode(mut self, mode: ViewMode) -> Self {
        self.view_mode = mode;
        self
    }

    #[must_use]
    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    /// Enable or disable diagram rendering and pick the mermaid theme.
    #[must_use]
    pub const fn with_diagrams(mut self, enabled: bool, theme: DiagramTheme) -> Self {
        self.diagrams_enabled = enabled;
        self.diagram_theme = theme;
        self
    }

    #[must_use]
    pub fn with_diagram_engine(mut self, engine: Arc<dyn DiagramEngine>) -> Self {
        self.diagram_engine = engine;
        self
    }

    #[must_use]
    pub fn with_enhancer(mut self, enhancer: Arc<dyn Enhancer>) -> Self {
        self.enhancer = enhancer;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
