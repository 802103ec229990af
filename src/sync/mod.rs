//! Proportional scroll synchronization between the source and rendered panes.
//!
//! Scrolling one pane moves the other to the same relative position. The
//! write into the other pane produces a scroll event of its own; [`SyncLock`]
//! records which pane started the exchange so that echo is ignored until the
//! next frame boundary.
//!
//! ```
//! use splitmark::sync::{Pane, ScrollRegion, ScrollSync, SyncOutcome};
//!
//! struct Region { offset: f64, extent: f64, viewport: f64 }
//!
//! impl ScrollRegion for Region {
//!     fn scroll_offset(&self) -> f64 { self.offset }
//!     fn scroll_extent(&self) -> f64 { self.extent }
//!     fn viewport_extent(&self) -> f64 { self.viewport }
//!     fn set_scroll_offset(&mut self, offset: f64) { self.offset = offset; }
//! }
//!
//! let mut source = Region { offset: 50.0, extent: 200.0, viewport: 100.0 };
//! let mut rendered = Region { offset: 0.0, extent: 500.0, viewport: 100.0 };
//! let mut sync = ScrollSync::new();
//!
//! let outcome = sync.on_scroll(Pane::Source, &mut source, &mut rendered);
//! assert!(matches!(outcome, SyncOutcome::Synced { target: Pane::Rendered, .. }));
//! assert_eq!(rendered.scroll_offset(), 200.0);
//! ```

/// One of the two synchronized panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    /// The editable markdown source.
    Source,
    /// The rendered preview.
    Rendered,
}

impl Pane {
    /// The pane on the opposite side of the split.
    pub const fn other(self) -> Self {
        match self {
            Self::Source => Self::Rendered,
            Self::Rendered => Self::Source,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Rendered => "rendered",
        }
    }
}

/// A scrollable area measured in abstract units (rows for terminal panes).
pub trait ScrollRegion {
    /// Distance scrolled from the top.
    fn scroll_offset(&self) -> f64;

    /// Total content length.
    fn scroll_extent(&self) -> f64;

    /// Visible length.
    fn viewport_extent(&self) -> f64;

    /// Move the region. Implementations clamp to their own bounds.
    fn set_scroll_offset(&mut self, offset: f64);

    /// How far the region can scroll. Zero or negative means no overflow.
    fn scrollable_range(&self) -> f64 {
        self.scroll_extent() - self.viewport_extent()
    }
}

/// Which pane, if any, currently owns the synchronization exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncLock {
    #[default]
    Free,
    Held(Pane),
}

/// Result of handling one scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The other pane was written to.
    Synced {
        target: Pane,
        offset: f64,
        /// Whether the write actually moved the target.
        changed: bool,
    },
    /// The event is the echo of a write made by the opposite pane.
    Suppressed,
    /// One of the panes has nothing to scroll.
    NoRange,
}

/// Lock state for the bidirectional scroll exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollSync {
    lock: SyncLock,
}

impl ScrollSync {
    pub const fn new() -> Self {
        Self {
            lock: SyncLock::Free,
        }
    }

    pub const fn lock(&self) -> SyncLock {
        self.lock
    }

    /// Handle a scroll event that originated in `origin`.
    ///
    /// The lock is acquired even when the write turns out to be a no-op, so a
    /// late echo from the other pane is still ignored for the rest of the frame.
    pub fn on_scroll<S, R>(&mut self, origin: Pane, source: &mut S, rendered: &mut R) -> SyncOutcome
    where
        S: ScrollRegion + ?Sized,
        R: ScrollRegion + ?Sized,
    {
        if self.lock == SyncLock::Held(origin.other()) {
            tracing::trace!(origin = origin.label(), "scroll echo suppressed");
            return SyncOutcome::Suppressed;
        }
        self.lock = SyncLock::Held(origin);

        match origin {
            Pane::Source => sync_regions(&*source, &mut *rendered, Pane::Rendered),
            Pane::Rendered => sync_regions(&*rendered, &mut *source, Pane::Source),
        }
    }

    /// Release the lock. Called once per drawn frame.
    pub const fn on_frame(&mut self) {
        self.lock = SyncLock::Free;
    }
}

fn sync_regions<F, T>(from: &F, to: &mut T, target: Pane) -> SyncOutcome
where
    F: ScrollRegion + ?Sized,
    T: ScrollRegion + ?Sized,
{
    let from_range = from.scrollable_range();
    let to_range = to.scrollable_range();
    if from_range <= 0.0 || to_range <= 0.0 {
        return SyncOutcome::NoRange;
    }

    let progress = (from.scroll_offset() / from_range).clamp(0.0, 1.0);
    let before = to.scroll_offset();
    to.set_scroll_offset(progress * to_range);
    let offset = to.scroll_offset();
    SyncOutcome::Synced {
        target,
        offset,
        changed: (offset - before).abs() > f64::EPSILON,
    }
}

/// Apply a wheel delta to a region whose chrome, not content, was under the
/// pointer. Returns whether the offset moved.
pub fn forward_wheel<R: ScrollRegion + ?Sized>(region: &mut R, delta: f64) -> bool {
    let range = region.scrollable_range();
    if range <= 0.0 {
        return false;
    }
    let before = region.scroll_offset();
    region.set_scroll_offset((before + delta).clamp(0.0, range));
    (region.scroll_offset() - before).abs() > f64::EPSILON
}
