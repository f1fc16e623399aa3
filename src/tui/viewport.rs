//! Terminal implementation of the visibility observer.
//!
//! The terminal has no element-visibility events, so the render loop feeds
//! this observer the row span of every placed target plus the scrolled window,
//! then calls [`TerminalViewport::evaluate`]. A target counts as entered when
//! its span comes within its margin of the window, having been outside on the
//! previous evaluation (or never evaluated since it was observed).

use std::collections::{HashMap, HashSet};

use crate::engine::{ObserveError, Target, VisibilityObserver};

/// Rows a target occupies in grid content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    /// First row
    pub top: u32,
    /// Number of rows (at least 1 is assumed)
    pub height: u32,
}

impl RowSpan {
    /// Whether the span intersects `[start, end)` grown by `margin` on both sides.
    #[must_use]
    pub const fn near(&self, start: u32, end: u32, margin: u32) -> bool {
        let bottom = self.top + if self.height == 0 { 1 } else { self.height };
        self.top < end.saturating_add(margin) && bottom > start.saturating_sub(margin)
    }
}

/// Visibility observer over the scrolled item grid.
#[derive(Debug, Default)]
pub struct TerminalViewport {
    scroll: u32,
    height: u32,
    observed: HashMap<Target, u32>,
    layout: HashMap<Target, RowSpan>,
    inside: HashSet<Target>,
    entered: Vec<Target>,
}

impl TerminalViewport {
    /// Creates an observer with an empty window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scrolled window: first visible row and number of rows.
    pub fn set_viewport(&mut self, scroll: u32, height: u32) {
        self.scroll = scroll;
        self.height = height;
    }

    /// Forgets every placement; targets not placed again stay un-evaluated.
    pub fn clear_layout(&mut self) {
        self.layout.clear();
    }

    /// Records where `target` was laid out.
    pub fn place(&mut self, target: Target, span: RowSpan) {
        self.layout.insert(target, span);
    }

    /// Compares every observed, placed target against the window and queues
    /// those that just came into range.
    pub fn evaluate(&mut self) {
        let start = self.scroll;
        let end = self.scroll.saturating_add(self.height);

        // Deterministic order: top to bottom
        let mut candidates: Vec<(&Target, &RowSpan, u32)> = self
            .observed
            .iter()
            .filter_map(|(target, margin)| {
                self.layout.get(target).map(|span| (target, span, *margin))
            })
            .collect();
        candidates.sort_by_key(|(_, span, _)| span.top);

        let mut now_inside = Vec::new();
        let mut now_outside = Vec::new();
        for (target, span, margin) in candidates {
            if span.near(start, end, margin) {
                if !self.inside.contains(target) {
                    now_inside.push(target.clone());
                }
            } else {
                now_outside.push(target.clone());
            }
        }

        for target in now_outside {
            self.inside.remove(&target);
        }
        for target in now_inside {
            self.inside.insert(target.clone());
            self.entered.push(target);
        }
    }

    /// Whether entries are waiting to be drained.
    #[must_use]
    pub fn has_entries(&self) -> bool {
        !self.entered.is_empty()
    }

    /// Number of targets currently watched.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Whether `target` is currently watched.
    #[must_use]
    pub fn is_observing(&self, target: &Target) -> bool {
        self.observed.contains_key(target)
    }
}

impl VisibilityObserver for TerminalViewport {
    fn observe(&mut self, target: Target, margin: u32) -> Result<(), ObserveError> {
        self.observed.insert(target, margin);
        Ok(())
    }

    fn unobserve(&mut self, target: &Target) {
        self.observed.remove(target);
        self.layout.remove(target);
        self.inside.remove(target);
        self.entered.retain(|t| t != target);
    }

    fn drain_entered(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.entered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;

    fn item(id: &str) -> Target {
        Target::Item(ItemId::new(id))
    }

    #[test]
    fn test_span_near_with_margin() {
        let span = RowSpan { top: 30, height: 6 };
        assert!(!span.near(0, 20, 0));
        assert!(!span.near(0, 20, 10));
        assert!(span.near(0, 20, 11));
        assert!(span.near(25, 45, 0));
        // Above the window
        assert!(!span.near(40, 60, 0));
        assert!(span.near(40, 60, 5));
    }

    #[test]
    fn test_unplaced_targets_never_enter() {
        let mut viewport = TerminalViewport::new();
        viewport.set_viewport(0, 20);
        viewport.observe(item("a"), 0).unwrap();
        viewport.evaluate();
        assert!(viewport.drain_entered().is_empty());
    }

    #[test]
    fn test_enters_once_per_transition() {
        let mut viewport = TerminalViewport::new();
        viewport.set_viewport(0, 20);
        viewport.observe(item("a"), 0).unwrap();
        viewport.place(item("a"), RowSpan { top: 30, height: 6 });

        viewport.evaluate();
        assert!(viewport.drain_entered().is_empty());

        viewport.set_viewport(20, 20);
        viewport.evaluate();
        assert_eq!(viewport.drain_entered(), vec![item("a")]);

        // Still in view: no repeat
        viewport.evaluate();
        assert!(viewport.drain_entered().is_empty());

        // Out and back in fires again
        viewport.set_viewport(100, 20);
        viewport.evaluate();
        viewport.set_viewport(20, 20);
        viewport.evaluate();
        assert_eq!(viewport.drain_entered(), vec![item("a")]);
    }

    #[test]
    fn test_already_visible_at_observe_fires() {
        let mut viewport = TerminalViewport::new();
        viewport.set_viewport(0, 20);
        viewport.observe(item("a"), 2).unwrap();
        viewport.place(item("a"), RowSpan { top: 0, height: 6 });
        viewport.evaluate();
        assert_eq!(viewport.drain_entered(), vec![item("a")]);
    }

    #[test]
    fn test_entries_ordered_top_to_bottom() {
        let mut viewport = TerminalViewport::new();
        viewport.set_viewport(0, 40);
        for (id, top) in [("c", 12), ("a", 0), ("b", 6)] {
            viewport.observe(item(id), 0).unwrap();
            viewport.place(item(id), RowSpan { top, height: 6 });
        }
        viewport.evaluate();
        assert_eq!(viewport.drain_entered(), vec![item("a"), item("b"), item("c")]);
    }

    #[test]
    fn test_unobserve_drops_pending_entry() {
        let mut viewport = TerminalViewport::new();
        viewport.set_viewport(0, 20);
        viewport.observe(item("a"), 0).unwrap();
        viewport.place(item("a"), RowSpan { top: 0, height: 6 });
        viewport.evaluate();
        viewport.unobserve(&item("a"));
        assert!(viewport.drain_entered().is_empty());
        assert_eq!(viewport.observed_count(), 0);
        assert!(!viewport.is_observing(&item("a")));
    }
}
