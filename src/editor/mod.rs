//! The source pane's document buffer.
//!
//! A rope with a character-indexed cursor. Wholesale replacement (import,
//! clear, enhancement) goes through [`DocumentBuffer::replace_text`].

mod buffer;

pub use buffer::{Cursor, Direction, DocumentBuffer};
