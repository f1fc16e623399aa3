//! Application-wide constants.
//!
//! This module defines the application name and the fixed defaults used by
//! the catalog view when no configuration overrides them.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "LazyShelf";

/// The binary name of the application (used in command examples, lowercase).
pub const APP_BINARY_NAME: &str = "lazyshelf";

/// Number of items revealed per batch, shared by manual and automatic growth.
pub const DEFAULT_BATCH_SIZE: usize = 6;

/// Reserved category filter key that matches every item.
pub const ALL_CATEGORIES: &str = "all";

/// Proximity margin (terminal rows) around the viewport for the load-more sentinel.
pub const DEFAULT_SENTINEL_MARGIN: u32 = 4;

/// Proximity margin (terminal rows) around the viewport for item placeholders.
pub const DEFAULT_ITEM_MARGIN: u32 = 2;

/// Reveal stagger per position within a batch, in milliseconds.
pub const DEFAULT_STAGGER_STEP_MS: u64 = 50;

/// Upper bound for the reveal stagger, in milliseconds.
pub const DEFAULT_STAGGER_CAP_MS: u64 = 300;

/// Display locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";
