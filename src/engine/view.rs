//! The catalog view: a single-threaded dispatcher tying the engines together.
//!
//! Inputs are queued as [`Action`]s and applied in order by
//! [`CatalogView::tick`]. Within a tick:
//!
//! 1. viewport entries reported by the observer are queued after user input;
//! 2. queued actions run in order; filter changes only mark the filter dirty,
//!    and the pass runs (atomically) before the next non-filter action;
//! 3. grow requests issued on an earlier tick are applied, and any request
//!    whose filtered set has since been replaced is discarded;
//! 4. the sentinel is re-armed and placeholders are mounted/unmounted to
//!    match the visible slice, then due reveals fire.
//!
//! A reset therefore always wins over a grow that was in flight when the
//! filter changed.

use std::collections::VecDeque;
use std::mem;
use std::num::NonZeroUsize;
use std::time::Instant;

use serde::Serialize;

use super::disclosure::{Disclosure, Footer, GrowOutcome};
use super::filter::{self, FilterState};
use super::reveal::{Immediate, RevealGates, RevealSchedule, Staggered};
use super::visibility::{
    Armed, GrowRequest, GrowSource, SentinelGate, Target, VisibilityObserver,
};
use crate::config::BrowseConfig;
use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_ITEM_MARGIN, DEFAULT_SENTINEL_MARGIN};
use crate::models::{Catalog, CategoryFilter, Item, ItemId};

/// Input to the view.
#[derive(Debug)]
pub enum Action {
    /// Select a category (or all)
    SelectCategory(CategoryFilter),
    /// Replace the free-text query
    SetQuery(String),
    /// Explicit "load more"
    LoadMore,
    /// A watched target entered the viewport
    Entered(Target),
    /// Swap in a freshly fetched catalog (full replacement)
    ReplaceCatalog(Box<Catalog>),
}

impl Action {
    const fn changes_filter(&self) -> bool {
        matches!(
            self,
            Self::SelectCategory(_) | Self::SetQuery(_) | Self::ReplaceCatalog(_)
        )
    }
}

/// Tuning for a view; fixed for the view's lifetime.
pub struct ViewOptions {
    /// Items per batch
    pub batch_size: NonZeroUsize,
    /// Proximity margin for the load-more sentinel
    pub sentinel_margin: u32,
    /// Proximity margin for item placeholders
    pub item_margin: u32,
    /// Reveal delay policy
    pub schedule: Box<dyn RevealSchedule>,
}

impl ViewOptions {
    /// Options with the given batch size and no reveal delay.
    #[must_use]
    pub fn with_batch_size(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    /// Options derived from the `[browse]` configuration section.
    #[must_use]
    pub fn from_config(browse: &BrowseConfig) -> Self {
        Self {
            batch_size: NonZeroUsize::new(browse.batch_size).unwrap_or(NonZeroUsize::MIN),
            sentinel_margin: browse.sentinel_margin,
            item_margin: browse.item_margin,
            schedule: Box::new(Staggered::from_millis(
                browse.stagger_step_ms,
                browse.stagger_cap_ms,
            )),
        }
    }
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            sentinel_margin: DEFAULT_SENTINEL_MARGIN,
            item_margin: DEFAULT_ITEM_MARGIN,
            schedule: Box::new(Immediate),
        }
    }
}

/// What the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    /// Visible slice, in catalog order
    pub visible: Vec<ItemId>,
    /// Revealed flag per visible item (parallel to `visible`)
    pub revealed: Vec<bool>,
    /// Whether more items remain
    pub has_more: bool,
    /// Total filtered matches
    pub total: usize,
    /// A filter pass is pending
    pub busy: bool,
    /// A grow request is in flight
    pub loading_more: bool,
    /// Footer to show below the slice
    pub footer: Footer,
    /// Whether the filter inputs are at their defaults
    pub filter_is_default: bool,
}

/// Client-side catalog view-model.
///
/// Owns the catalog, the filter inputs, the disclosure state and both gates,
/// plus the host's observer. Dropping the view releases every observation.
pub struct CatalogView<O: VisibilityObserver> {
    catalog: Catalog,
    observer: O,
    /// Latest user input; what the search box shows
    input: FilterState,
    /// Filter state the current filtered set reflects
    applied: FilterState,
    /// Catalog positions of the filtered set
    filtered: Vec<usize>,
    filter_dirty: bool,
    disclosure: Disclosure,
    sentinel: SentinelGate,
    reveals: RevealGates,
    queue: VecDeque<Action>,
    in_flight: Vec<GrowRequest>,
}

impl<O: VisibilityObserver> CatalogView<O> {
    /// Mounts a view over `catalog` with no filters applied.
    ///
    /// The first batch is computed immediately; placeholders are mounted on
    /// the first [`CatalogView::tick`].
    pub fn new(catalog: Catalog, observer: O, options: ViewOptions) -> Self {
        let mut view = Self {
            catalog,
            observer,
            input: FilterState::default(),
            applied: FilterState::default(),
            filtered: Vec::new(),
            filter_dirty: false,
            disclosure: Disclosure::new(options.batch_size),
            sentinel: SentinelGate::new(options.sentinel_margin),
            reveals: RevealGates::new(options.item_margin, options.schedule),
            queue: VecDeque::new(),
            in_flight: Vec::new(),
        };
        view.run_filter_pass();
        view
    }

    /// Queues an input. Filter inputs are visible through
    /// [`CatalogView::filter_input`] right away and mark the view busy until
    /// the next tick applies them.
    pub fn dispatch(&mut self, action: Action) {
        match &action {
            Action::SelectCategory(category) => self.input.category = category.clone(),
            Action::SetQuery(query) => self.input.query.clone_from(query),
            _ => {}
        }
        self.queue.push_back(action);
    }

    /// Selects a category by key (`"all"` selects everything).
    pub fn select_category(&mut self, key: &str) {
        self.dispatch(Action::SelectCategory(CategoryFilter::parse(key)));
    }

    /// Replaces the query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(Action::SetQuery(query.into()));
    }

    /// Requests one more batch.
    pub fn load_more(&mut self) {
        self.dispatch(Action::LoadMore);
    }

    /// Runs one scheduling step.
    pub fn tick(&mut self, now: Instant) {
        let ready = mem::take(&mut self.in_flight);

        for target in self.observer.drain_entered() {
            self.queue.push_back(Action::Entered(target));
        }

        while let Some(action) = self.queue.pop_front() {
            if !action.changes_filter() {
                self.flush_filter();
            }
            self.apply(action, now);
        }
        self.flush_filter();

        let mut applied_grow = false;
        for request in ready {
            match self.disclosure.grow(request.generation) {
                GrowOutcome::Grew { from, to } => {
                    tracing::debug!("Revealed {from} -> {to} ({:?})", request.source);
                    applied_grow = true;
                }
                GrowOutcome::Exhausted => {
                    tracing::debug!("Grow ignored: nothing more to reveal");
                }
                GrowOutcome::Stale => {
                    tracing::debug!("Discarded grow issued against an older filter");
                    continue;
                }
            }
            self.sentinel.settle();
        }
        if applied_grow || !self.sentinel.is_pending() {
            self.arm_sentinel();
        }

        let visible = self.visible_ids();
        let batch = self.disclosure.batch_size().get();
        self.reveals.sync(&visible, batch, &mut self.observer, now);
        for id in self.reveals.advance(now) {
            tracing::trace!("Revealed item {id}");
        }
    }

    /// Ticks until no input, grow, or reveal is outstanding at `now`.
    pub fn settle(&mut self, now: Instant) {
        // Each round either drains work or leaves nothing pending
        for _ in 0..1024 {
            self.tick(now);
            let entered = self.observer_has_entries();
            if self.queue.is_empty() && self.in_flight.is_empty() && !entered {
                break;
            }
        }
    }

    fn observer_has_entries(&mut self) -> bool {
        let entries = self.observer.drain_entered();
        let has = !entries.is_empty();
        self.queue.extend(entries.into_iter().map(Action::Entered));
        has
    }

    fn apply(&mut self, action: Action, now: Instant) {
        match action {
            Action::SelectCategory(category) => {
                self.applied.category = category;
                self.filter_dirty = true;
            }
            Action::SetQuery(query) => {
                self.applied.query = query;
                self.filter_dirty = true;
            }
            Action::ReplaceCatalog(catalog) => {
                tracing::info!("Catalog replaced ({} items)", catalog.len());
                self.catalog = *catalog;
                self.filter_dirty = true;
            }
            Action::LoadMore => self.request_grow(GrowSource::Manual),
            Action::Entered(Target::Sentinel(key)) => {
                if let Some(request) = self.sentinel.on_entered(key, &self.disclosure) {
                    self.in_flight.push(request);
                }
            }
            Action::Entered(Target::Item(id)) => {
                self.reveals.on_entered(&id, &mut self.observer, now);
            }
        }
    }

    fn request_grow(&mut self, source: GrowSource) {
        if let Some(request) = self.sentinel.request(&self.disclosure, source) {
            self.in_flight.push(request);
        }
    }

    fn flush_filter(&mut self) {
        if self.filter_dirty {
            self.filter_dirty = false;
            self.run_filter_pass();
        }
    }

    /// Recomputes the filtered set and resets disclosure. Always resets, even
    /// when the new set happens to equal the old one.
    fn run_filter_pass(&mut self) {
        self.filtered = filter::filter(&self.catalog, &self.applied);
        let generation = self.disclosure.reset(self.filtered.len());
        self.sentinel.reset(&mut self.observer);
        self.arm_sentinel();

        tracing::debug!(
            "Filter category={} query={:?}: {} matches, showing {} ({:?})",
            self.applied.category,
            self.applied.query,
            self.filtered.len(),
            self.disclosure.revealed_count(),
            generation
        );
    }

    fn arm_sentinel(&mut self) {
        if let Armed::Immediate(key) = self.sentinel.rearm(&mut self.observer, &self.disclosure) {
            self.queue.push_back(Action::Entered(Target::Sentinel(key)));
        }
    }

    fn visible_ids(&self) -> Vec<ItemId> {
        self.visible_items().map(|item| item.id.clone()).collect()
    }

    /// Visible slice as item records, in catalog order.
    pub fn visible_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.filtered[self.disclosure.visible_range()]
            .iter()
            .filter_map(|&idx| self.catalog.items().get(idx))
    }

    /// Whether the item's full presentation should replace its placeholder.
    #[must_use]
    pub fn is_revealed(&self, id: &ItemId) -> bool {
        self.reveals.is_revealed(id)
    }

    /// Earliest pending reveal, for hosts that sleep between ticks.
    #[must_use]
    pub fn next_reveal_deadline(&self) -> Option<Instant> {
        self.reveals.next_deadline()
    }

    /// Frame data for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> ViewSnapshot {
        let visible = self.visible_ids();
        let revealed = visible.iter().map(|id| self.is_revealed(id)).collect();
        ViewSnapshot {
            visible,
            revealed,
            has_more: self.disclosure.has_more(),
            total: self.filtered.len(),
            busy: self.is_busy(),
            loading_more: self.sentinel.is_pending(),
            footer: self.disclosure.footer(),
            filter_is_default: self.input.is_default(),
        }
    }

    /// A filter change is waiting to be applied.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.filter_dirty || self.queue.iter().any(Action::changes_filter)
    }

    /// Filter inputs as last typed/selected.
    #[must_use]
    pub const fn filter_input(&self) -> &FilterState {
        &self.input
    }

    /// Filter state reflected by the current filtered set.
    #[must_use]
    pub const fn applied_filter(&self) -> &FilterState {
        &self.applied
    }

    /// The catalog being browsed.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Disclosure state (revealed count, batch size, footer).
    #[must_use]
    pub const fn disclosure(&self) -> &Disclosure {
        &self.disclosure
    }

    /// Number of filtered matches.
    #[must_use]
    pub fn total(&self) -> usize {
        self.filtered.len()
    }

    /// The host observer.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the host observer (e.g. to feed it layout).
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Releases every observation held by the view.
    pub fn release(&mut self) {
        self.sentinel.retire(&mut self.observer);
        self.reveals.unmount_all(&mut self.observer);
    }
}

impl<O: VisibilityObserver> Drop for CatalogView<O> {
    fn drop(&mut self) {
        self.release();
    }
}
