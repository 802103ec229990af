//! Per-pane scroll state.
//!
//! Each pane of the split owns a [`Viewport`] measured in terminal rows. The
//! viewport is also the pane's [`ScrollRegion`], so the synchronizer reads
//! and writes it directly.

use std::ops::Range;

use crate::sync::ScrollRegion;

/// Visible window over a pane's lines.
///
/// # Example
///
/// ```
/// use splitmark::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_by(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a new viewport.
    ///
    /// # Arguments
    ///
    /// * `width` - Pane content width in columns
    /// * `height` - Pane content height in rows
    /// * `total_lines` - Total lines the pane displays
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Range of line indices currently on screen, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }

        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    /// Scroll by a signed number of rows. Returns whether the offset moved.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let before = self.offset;
        self.offset = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            (self.offset + delta.unsigned_abs()).min(self.max_offset())
        };
        self.offset != before
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll_by(-(self.height as isize))
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll_by(self.height as isize)
    }

    /// Put `line` at the top of the viewport (clamped).
    pub fn go_to_line(&mut self, line: usize) {
        self.offset = line.min(self.max_offset());
    }

    /// Scroll the minimum amount needed for `line` to be on screen.
    /// Returns whether the offset moved.
    pub fn ensure_visible(&mut self, line: usize) -> bool {
        let before = self.offset;
        let height = (self.height as usize).max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
        self.offset = self.offset.min(self.max_offset());
        self.offset != before
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the content length (e.g. after a re-render).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

impl ScrollRegion for Viewport {
    #[allow(clippy::cast_precision_loss)]
    fn scroll_offset(&self) -> f64 {
        self.offset as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn scroll_extent(&self) -> f64 {
        self.total_lines as f64
    }

    fn viewport_extent(&self) -> f64 {
        f64::from(self.height)
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        // Rows are whole; nearest row keeps the round trip stable.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = offset.max(0.0).round() as usize;
        self.offset = row.min(self.max_offset());
    }
}
