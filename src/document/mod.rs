//! Markdown rendering.
//!
//! Two stages:
//! - [`render`] parses markdown with comrak into a [`VisualTree`]
//! - [`layout`] flattens the tree into styled [`RenderedLine`]s for a given
//!   pane width, drawing diagram slots from a [`crate::diagram::DiagramSet`]

mod layout;
mod render;
mod types;

pub use layout::layout;
pub use render::{DIAGRAM_LANGUAGE, render};
pub use types::{
    Alignment, InlineColor, InlineSpan, InlineStyle, LineType, RenderedLine, VisualNode,
    VisualTree,
};
