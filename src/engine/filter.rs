//! Filter engine: narrows the catalog by category and free-text query.

use serde::{Deserialize, Serialize};

use crate::models::{Catalog, CategoryFilter, Item};

/// User-owned filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected category, or everything
    pub category: CategoryFilter,
    /// Free-text query; empty matches everything
    pub query: String,
}

impl FilterState {
    /// Creates a filter state from a category key and a query.
    pub fn new(category: &str, query: impl Into<String>) -> Self {
        Self {
            category: CategoryFilter::parse(category),
            query: query.into(),
        }
    }

    /// Returns true when no filter is active (all categories, empty query).
    ///
    /// The presentation layer uses this to tell an empty catalog apart from a
    /// filter that matched nothing.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.category.is_all() && self.query.is_empty()
    }
}

/// Category predicate: `"all"` matches everything, otherwise keys must be equal.
#[must_use]
pub fn matches_category(filter: &CategoryFilter, item: &Item) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Only(key) => item.category.as_ref() == Some(key),
    }
}

/// Text predicate over pre-lowercased search text.
///
/// `query_lower` must already be lowercased. Every locale is searched, so a
/// query typed in either language matches regardless of the display locale.
#[must_use]
pub fn matches_query(search_text: &[String], query_lower: &str) -> bool {
    query_lower.is_empty() || search_text.iter().any(|text| text.contains(query_lower))
}

/// Returns the catalog positions of every matching item, in catalog order.
///
/// Pure function of its inputs; cheap enough to run on every keystroke.
#[must_use]
pub fn filter(catalog: &Catalog, state: &FilterState) -> Vec<usize> {
    let query_lower = state.query.to_lowercase();

    catalog
        .items()
        .iter()
        .enumerate()
        .filter(|(idx, item)| {
            matches_category(&state.category, item)
                && matches_query(catalog.search_text(*idx), &query_lower)
        })
        .map(|(idx, _)| idx)
        .collect()
}

/// Convenience wrapper over [`filter`] returning item references.
#[must_use]
pub fn filter_items<'a>(catalog: &'a Catalog, state: &FilterState) -> Vec<&'a Item> {
    filter(catalog, state)
        .into_iter()
        .filter_map(|idx| catalog.items().get(idx))
        .collect()
}
