// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. diagram::DiagramSet)
    clippy::module_name_repetitions
)]

//! # splitmark
//!
//! A split-pane markdown editor for the terminal.
//!
//! splitmark edits markdown on the left and previews it on the right with:
//! - Scroll synchronization between the two panes
//! - Mermaid diagrams rendered off the UI thread
//! - Gemini-backed text transforms
//! - Import from `.md` / `.txt` and export to a fixed file name
//!
//! ## Architecture
//!
//! splitmark uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`sync`]: Proportional scroll synchronization
//! - [`document`]: Markdown to visual tree, and tree to terminal lines
//! - [`diagram`]: Mermaid diagram lifecycle and rendering worker
//! - [`enhance`]: Gemini text enhancement
//! - [`editor`]: Rope-backed text buffer
//! - [`files`]: Import and export
//! - [`ui`]: Terminal UI components

pub mod app;
pub mod config;
pub mod debug_log;
pub mod diagram;
pub mod document;
pub mod editor;
pub mod enhance;
pub mod files;
pub mod sync;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{VisualTree, layout, render};
    pub use crate::sync::{Pane, ScrollSync};
    pub use crate::ui::viewport::Viewport;
}
