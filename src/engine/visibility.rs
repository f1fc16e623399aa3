//! Viewport observation capability and the batch-level sentinel gate.
//!
//! The core only talks to a [`VisibilityObserver`]: register a target with a
//! proximity margin, unregister it, and collect the targets that entered the
//! viewport since the last call. Hosts implement it over whatever "element is
//! now visible" signal they have.

use std::fmt;

use super::disclosure::{Disclosure, Generation};
use crate::models::ItemId;

/// Position of the load-more sentinel: the filtered set and the boundary it follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentinelKey {
    /// Filtered set the sentinel belongs to
    pub generation: Generation,
    /// Revealed count the sentinel sits after
    pub boundary: usize,
}

/// Something the view asks the host to watch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// The marker placed right after the visible slice
    Sentinel(SentinelKey),
    /// An item placeholder
    Item(ItemId),
}

/// Observation could not be established for a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserveError {
    /// The host has no observation mechanism
    Unavailable(String),
}

impl fmt::Display for ObserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "viewport observation unavailable: {reason}"),
        }
    }
}

impl std::error::Error for ObserveError {}

/// Narrow "element entered the viewport" capability.
pub trait VisibilityObserver {
    /// Starts watching `target`; it counts as entered once it comes within
    /// `margin` units of the viewport.
    fn observe(&mut self, target: Target, margin: u32) -> Result<(), ObserveError>;

    /// Stops watching `target`. Unknown targets are ignored.
    fn unobserve(&mut self, target: &Target);

    /// Returns targets that entered the viewport since the last call, in the
    /// order they entered.
    fn drain_entered(&mut self) -> Vec<Target>;
}

/// Observer for hosts without any observation mechanism.
///
/// Every `observe` fails, which makes both gates fail open.
#[derive(Debug, Default)]
pub struct UnavailableObserver;

impl VisibilityObserver for UnavailableObserver {
    fn observe(&mut self, _target: Target, _margin: u32) -> Result<(), ObserveError> {
        Err(ObserveError::Unavailable("no viewport observer".to_string()))
    }

    fn unobserve(&mut self, _target: &Target) {}

    fn drain_entered(&mut self) -> Vec<Target> {
        Vec::new()
    }
}

/// Observer driven by explicit calls, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct ManualObserver {
    observed: Vec<(Target, u32)>,
    entered: Vec<Target>,
}

impl ManualObserver {
    /// Creates an observer with nothing watched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `target` as entered if it is currently watched.
    pub fn enter(&mut self, target: &Target) -> bool {
        if self.is_observing(target) {
            self.entered.push(target.clone());
            true
        } else {
            false
        }
    }

    /// Reports every watched item placeholder as entered.
    pub fn enter_all_items(&mut self) {
        let items: Vec<Target> = self
            .observed
            .iter()
            .filter(|(t, _)| matches!(t, Target::Item(_)))
            .map(|(t, _)| t.clone())
            .collect();
        self.entered.extend(items);
    }

    /// Reports the currently watched sentinel as entered.
    pub fn enter_sentinel(&mut self) -> bool {
        match self.sentinel() {
            Some(key) => self.enter(&Target::Sentinel(key)),
            None => false,
        }
    }

    /// The sentinel currently watched, if any.
    #[must_use]
    pub fn sentinel(&self) -> Option<SentinelKey> {
        self.observed.iter().find_map(|(t, _)| match t {
            Target::Sentinel(key) => Some(*key),
            Target::Item(_) => None,
        })
    }

    /// Whether `target` is currently watched.
    #[must_use]
    pub fn is_observing(&self, target: &Target) -> bool {
        self.observed.iter().any(|(t, _)| t == target)
    }

    /// Number of targets currently watched.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }
}

impl VisibilityObserver for ManualObserver {
    fn observe(&mut self, target: Target, margin: u32) -> Result<(), ObserveError> {
        if !self.is_observing(&target) {
            self.observed.push((target, margin));
        }
        Ok(())
    }

    fn unobserve(&mut self, target: &Target) {
        self.observed.retain(|(t, _)| t != target);
        self.entered.retain(|t| t != target);
    }

    fn drain_entered(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.entered)
    }
}

/// Where a grow request came from. Both sources share one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowSource {
    /// The sentinel entered the viewport
    Viewport,
    /// Explicit "load more"
    Manual,
}

/// A request to reveal one more batch of a specific filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowRequest {
    /// Filtered set the request was issued against
    pub generation: Generation,
    /// Origin of the request
    pub source: GrowSource,
}

/// Outcome of arming the sentinel at a new boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Armed {
    /// Nothing more to load; no sentinel
    Idle,
    /// The host is watching the sentinel
    Observing(SentinelKey),
    /// Observation failed; treat the sentinel as visible right away
    Immediate(SentinelKey),
}

/// Batch-level gate around the load-more sentinel.
///
/// At most one grow request is outstanding at a time (`grow_pending`); the
/// gate re-arms once that request is settled and the sentinel moves to the
/// new boundary.
#[derive(Debug)]
pub struct SentinelGate {
    margin: u32,
    armed: Option<SentinelKey>,
    grow_pending: bool,
}

impl SentinelGate {
    /// Creates a gate using `margin` as the proximity zone.
    #[must_use]
    pub fn new(margin: u32) -> Self {
        Self {
            margin,
            armed: None,
            grow_pending: false,
        }
    }

    /// Places the sentinel after the current visible slice.
    ///
    /// Retires any previous sentinel first. Does nothing while a grow is
    /// pending; the gate re-arms when it settles.
    pub fn rearm<O: VisibilityObserver + ?Sized>(
        &mut self,
        observer: &mut O,
        disclosure: &Disclosure,
    ) -> Armed {
        if self.grow_pending {
            return self.armed.map_or(Armed::Idle, Armed::Observing);
        }

        let key = SentinelKey {
            generation: disclosure.generation(),
            boundary: disclosure.revealed_count(),
        };
        if self.armed == Some(key) {
            return Armed::Observing(key);
        }

        self.retire(observer);
        if !disclosure.has_more() {
            return Armed::Idle;
        }

        self.armed = Some(key);
        match observer.observe(Target::Sentinel(key), self.margin) {
            Ok(()) => {
                tracing::debug!("Sentinel armed at boundary {}", key.boundary);
                Armed::Observing(key)
            }
            Err(e) => {
                tracing::warn!("Sentinel treated as visible: {e}");
                Armed::Immediate(key)
            }
        }
    }

    /// Handles the sentinel entering the viewport.
    ///
    /// Entries for a sentinel that is no longer armed are ignored.
    pub fn on_entered(&mut self, key: SentinelKey, disclosure: &Disclosure) -> Option<GrowRequest> {
        if self.armed != Some(key) {
            return None;
        }
        self.request(disclosure, GrowSource::Viewport)
    }

    /// Issues a grow request if more items remain and none is pending.
    ///
    /// Manual "load more" calls this directly; viewport entries go through
    /// [`SentinelGate::on_entered`] and end up here as well.
    pub fn request(&mut self, disclosure: &Disclosure, source: GrowSource) -> Option<GrowRequest> {
        if !disclosure.has_more() || self.grow_pending {
            return None;
        }
        self.grow_pending = true;
        Some(GrowRequest {
            generation: disclosure.generation(),
            source,
        })
    }

    /// Marks the outstanding grow as settled (applied or discarded).
    pub fn settle(&mut self) {
        self.grow_pending = false;
    }

    /// Forgets any pending grow because the filtered set was replaced.
    pub fn reset<O: VisibilityObserver + ?Sized>(&mut self, observer: &mut O) {
        self.settle();
        self.retire(observer);
    }

    /// Stops observing the current sentinel, if any.
    pub fn retire<O: VisibilityObserver + ?Sized>(&mut self, observer: &mut O) {
        if let Some(key) = self.armed.take() {
            observer.unobserve(&Target::Sentinel(key));
        }
    }

    /// Whether a grow request is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.grow_pending
    }

    /// The sentinel currently armed, if any.
    #[must_use]
    pub const fn armed(&self) -> Option<SentinelKey> {
        self.armed
    }
}
