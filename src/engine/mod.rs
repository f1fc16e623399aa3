//! Client-side catalog view-model.
//!
//! Decides, at any moment, which part of the in-memory catalog is filtered,
//! which prefix of that is materialized, and which materialized items are
//! actually shown in full:
//!
//! - [`filter`]: category + free-text narrowing, a pure function
//! - [`disclosure`]: revealed-count state and batch growth
//! - [`visibility`]: the observer capability and the load-more sentinel gate
//! - [`reveal`]: one-shot per-item reveal gates with a staggered delay policy
//! - [`view`]: the dispatcher that sequences all of the above

pub mod disclosure;
pub mod filter;
pub mod reveal;
pub mod view;
pub mod visibility;

pub use disclosure::{Disclosure, Footer, Generation, GrowOutcome};
pub use filter::{filter, filter_items, FilterState};
pub use reveal::{Immediate, RevealGates, RevealSchedule, Staggered};
pub use view::{Action, CatalogView, ViewOptions, ViewSnapshot};
pub use visibility::{
    GrowRequest, GrowSource, ManualObserver, ObserveError, SentinelGate, SentinelKey, Target,
    UnavailableObserver, VisibilityObserver,
};
