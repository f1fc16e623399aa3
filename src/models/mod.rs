//! Catalog data model.
//!
//! Items and categories are read-only once loaded; the view never mutates them.

pub mod catalog;
pub mod category;
pub mod item;

pub use catalog::{Catalog, CatalogDocument};
pub use category::{Category, CategoryFilter, CategoryKey};
pub use item::{Item, ItemId, LocalizedText, RoastLevel};
