//! Disclosure engine: incremental reveal of the filtered set, one batch at a time.

use serde::Serialize;
use std::num::NonZeroUsize;
use std::ops::Range;

/// Identity of a filtered set.
///
/// Bumped on every reset; grow requests carry the generation they were issued
/// against so a request that outlived its filtered set can be recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Generation(u64);

impl Generation {
    /// The generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Result of a grow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowOutcome {
    /// The revealed count increased
    Grew {
        /// Count before the grow
        from: usize,
        /// Count after the grow
        to: usize,
    },
    /// Nothing more to reveal; count unchanged
    Exhausted,
    /// The request targeted an older filtered set and was discarded
    Stale,
}

/// What the presentation layer shows below the visible slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Footer {
    /// The filtered set is empty
    NoResults,
    /// More items remain: show the sentinel / load-more trigger
    LoadMore,
    /// Everything is revealed and the set was larger than one batch
    EndOfResults,
    /// Everything fit in the first batch; show nothing
    Hidden,
}

/// Revealed-count state for the current filtered set.
///
/// `revealed` stays within `[0, filtered_len]`, only grows between resets, and
/// is reset to one batch whenever the filtered set changes.
#[derive(Debug, Clone)]
pub struct Disclosure {
    batch_size: NonZeroUsize,
    revealed: usize,
    filtered_len: usize,
    generation: Generation,
}

impl Disclosure {
    /// Creates an engine with nothing revealed.
    #[must_use]
    pub const fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            revealed: 0,
            filtered_len: 0,
            generation: Generation(0),
        }
    }

    /// Starts a new filtered set of `filtered_len` items.
    ///
    /// Reveals exactly one batch (or everything, if shorter) and returns the
    /// new generation.
    pub fn reset(&mut self, filtered_len: usize) -> Generation {
        self.generation = self.generation.next();
        self.filtered_len = filtered_len;
        self.revealed = self.batch_size.get().min(filtered_len);
        self.generation
    }

    /// Reveals one more batch, if the request still targets the current set.
    pub fn grow(&mut self, issued_at: Generation) -> GrowOutcome {
        if issued_at != self.generation {
            return GrowOutcome::Stale;
        }
        if !self.has_more() {
            return GrowOutcome::Exhausted;
        }

        let from = self.revealed;
        self.revealed = (self.revealed + self.batch_size.get()).min(self.filtered_len);
        GrowOutcome::Grew {
            from,
            to: self.revealed,
        }
    }

    /// Number of items eligible for rendering.
    #[must_use]
    pub const fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Size of the current filtered set.
    #[must_use]
    pub const fn filtered_len(&self) -> usize {
        self.filtered_len
    }

    /// Whether items remain beyond the revealed prefix.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.revealed < self.filtered_len
    }

    /// Identity of the current filtered set.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Items per batch.
    #[must_use]
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    /// Range of the filtered set currently revealed.
    #[must_use]
    pub const fn visible_range(&self) -> Range<usize> {
        0..self.revealed
    }

    /// Footer state for the presentation layer.
    #[must_use]
    pub const fn footer(&self) -> Footer {
        if self.filtered_len == 0 {
            Footer::NoResults
        } else if self.has_more() {
            Footer::LoadMore
        } else if self.filtered_len > self.batch_size.get() {
            Footer::EndOfResults
        } else {
            Footer::Hidden
        }
    }
}
