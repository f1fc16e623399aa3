//! Per-item reveal gates.
//!
//! Each placeholder in the visible slice waits until its own position comes
//! near the viewport, then switches to the full presentation after a small
//! staggered delay. Reveal is one-shot: a revealed item stays revealed for as
//! long as its placeholder is mounted.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::visibility::{Target, VisibilityObserver};
use crate::models::ItemId;

/// Presentation delay as a function of an item's position within its batch.
///
/// Purely cosmetic; correctness never depends on it.
pub trait RevealSchedule {
    /// Delay between the placeholder entering the viewport and the reveal.
    fn delay(&self, index_in_batch: usize) -> Duration;
}

/// No delay at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl RevealSchedule for Immediate {
    fn delay(&self, _index_in_batch: usize) -> Duration {
        Duration::ZERO
    }
}

/// `min(index * step, cap)`.
#[derive(Debug, Clone, Copy)]
pub struct Staggered {
    /// Extra delay per position
    pub step: Duration,
    /// Upper bound
    pub cap: Duration,
}

impl Staggered {
    /// Creates a stagger policy from millisecond values.
    #[must_use]
    pub const fn from_millis(step_ms: u64, cap_ms: u64) -> Self {
        Self {
            step: Duration::from_millis(step_ms),
            cap: Duration::from_millis(cap_ms),
        }
    }
}

impl RevealSchedule for Staggered {
    fn delay(&self, index_in_batch: usize) -> Duration {
        let index = u32::try_from(index_in_batch).unwrap_or(u32::MAX);
        self.step.saturating_mul(index).min(self.cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    /// Waiting for the placeholder to come into view
    Observing,
    /// In view; reveal once the delay has passed
    Scheduled { ready_at: Instant },
    /// Full presentation shown
    Revealed,
}

#[derive(Debug, Clone)]
struct ItemRevealGate {
    index_in_batch: usize,
    state: GateState,
}

/// All reveal gates for the currently mounted placeholders.
pub struct RevealGates {
    margin: u32,
    schedule: Box<dyn RevealSchedule>,
    gates: HashMap<ItemId, ItemRevealGate>,
}

impl std::fmt::Debug for RevealGates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealGates")
            .field("margin", &self.margin)
            .field("gates", &self.gates)
            .finish_non_exhaustive()
    }
}

impl RevealGates {
    /// Creates an empty set of gates.
    pub fn new(margin: u32, schedule: Box<dyn RevealSchedule>) -> Self {
        Self {
            margin,
            schedule,
            gates: HashMap::new(),
        }
    }

    /// Mounts placeholders for newly visible items and unmounts the rest.
    ///
    /// Items that stay visible keep their gate, so an already revealed item
    /// is not hidden again by a re-filter that still includes it.
    pub fn sync<O: VisibilityObserver + ?Sized>(
        &mut self,
        visible: &[ItemId],
        batch_size: usize,
        observer: &mut O,
        now: Instant,
    ) {
        let keep: HashSet<&ItemId> = visible.iter().collect();
        let removed: Vec<ItemId> = self
            .gates
            .keys()
            .filter(|id| !keep.contains(id))
            .cloned()
            .collect();
        for id in removed {
            self.unmount(&id, observer);
        }

        for (position, id) in visible.iter().enumerate() {
            if self.gates.contains_key(id) {
                continue;
            }
            let index_in_batch = position % batch_size.max(1);
            let state = match observer.observe(Target::Item(id.clone()), self.margin) {
                Ok(()) => GateState::Observing,
                Err(e) => {
                    tracing::warn!("Item {id} revealed without observation: {e}");
                    GateState::Scheduled {
                        ready_at: now + self.schedule.delay(index_in_batch),
                    }
                }
            };
            self.gates.insert(
                id.clone(),
                ItemRevealGate {
                    index_in_batch,
                    state,
                },
            );
        }
    }

    /// Handles a placeholder entering the viewport: schedule its reveal and
    /// stop observing it.
    pub fn on_entered<O: VisibilityObserver + ?Sized>(
        &mut self,
        id: &ItemId,
        observer: &mut O,
        now: Instant,
    ) {
        let Some(gate) = self.gates.get_mut(id) else {
            return;
        };
        if gate.state == GateState::Observing {
            gate.state = GateState::Scheduled {
                ready_at: now + self.schedule.delay(gate.index_in_batch),
            };
            observer.unobserve(&Target::Item(id.clone()));
        }
    }

    /// Reveals every scheduled item whose delay has passed; returns them.
    pub fn advance(&mut self, now: Instant) -> Vec<ItemId> {
        let mut revealed = Vec::new();
        for (id, gate) in &mut self.gates {
            if let GateState::Scheduled { ready_at } = gate.state {
                if ready_at <= now {
                    gate.state = GateState::Revealed;
                    revealed.push(id.clone());
                }
            }
        }
        revealed
    }

    /// Earliest pending reveal deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.gates
            .values()
            .filter_map(|gate| match gate.state {
                GateState::Scheduled { ready_at } => Some(ready_at),
                _ => None,
            })
            .min()
    }

    /// Whether the item's full presentation is shown.
    #[must_use]
    pub fn is_revealed(&self, id: &ItemId) -> bool {
        self.gates
            .get(id)
            .is_some_and(|gate| gate.state == GateState::Revealed)
    }

    /// Whether a placeholder for `id` is mounted.
    #[must_use]
    pub fn is_mounted(&self, id: &ItemId) -> bool {
        self.gates.contains_key(id)
    }

    /// Number of mounted placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns true when nothing is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Unmounts every placeholder, releasing their observations.
    pub fn unmount_all<O: VisibilityObserver + ?Sized>(&mut self, observer: &mut O) {
        for (id, gate) in self.gates.drain() {
            if gate.state == GateState::Observing {
                observer.unobserve(&Target::Item(id));
            }
        }
    }

    fn unmount<O: VisibilityObserver + ?Sized>(&mut self, id: &ItemId, observer: &mut O) {
        if let Some(gate) = self.gates.remove(id) {
            if gate.state == GateState::Observing {
                observer.unobserve(&Target::Item(id.clone()));
            }
        }
    }
}
