//! The catalog store: items and categories fetched once per session.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::{Category, CategoryKey, Item, ItemId};

/// On-disk shape of a catalog export.
///
/// Item records stay raw here so that one undecodable record can be skipped
/// without failing the whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Item records in store order
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
    /// Category records
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Immutable, already-fetched catalog.
///
/// Items keep the order the content store supplied. Each item's searchable
/// text (every locale of every text field) is lowercased once at load time so
/// filter passes are a plain substring scan.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    categories: Vec<Category>,
    /// Lowercased search text, parallel to `items`
    search_text: Vec<Vec<String>>,
    /// Position of each item by id
    by_id: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Builds a catalog, validating identifier uniqueness.
    ///
    /// Categories are ordered by their `order` field (unset last, ties keep
    /// their original order). Items referring to unknown categories are kept.
    pub fn new(items: Vec<Item>, mut categories: Vec<Category>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if by_id.insert(item.id.clone(), idx).is_some() {
                anyhow::bail!("Duplicate item id '{}' in catalog", item.id);
            }
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.key.clone()) {
                anyhow::bail!("Duplicate category key '{}' in catalog", category.key);
            }
        }
        categories.sort_by_key(|c| c.order.unwrap_or(i32::MAX));

        let search_text = items.iter().map(build_search_text).collect();

        Ok(Self {
            items,
            categories,
            search_text,
            by_id,
        })
    }

    /// Parses a catalog document from JSON.
    ///
    /// An item record that cannot be decoded is logged and skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: CatalogDocument =
            serde_json::from_str(json).context("Failed to parse catalog JSON")?;
        Self::new(decode_items(doc.items), doc.categories)
    }

    /// Loads a catalog document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read catalog file: {}", path.display()))?;
        let catalog = Self::from_json_str(&content)
            .context(format!("Invalid catalog file: {}", path.display()))?;

        tracing::info!(
            "Loaded catalog from {} ({} items, {} categories)",
            path.display(),
            catalog.len(),
            catalog.categories.len()
        );

        Ok(catalog)
    }

    /// All items in store order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// All categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.by_id.get(id).and_then(|&idx| self.items.get(idx))
    }

    /// Finds an item by id, then by slug.
    #[must_use]
    pub fn find(&self, id_or_slug: &str) -> Option<&Item> {
        self.get(&ItemId::new(id_or_slug)).or_else(|| {
            self.items
                .iter()
                .find(|item| item.slug.as_deref() == Some(id_or_slug))
        })
    }

    /// Gets a category by key.
    #[must_use]
    pub fn category(&self, key: &CategoryKey) -> Option<&Category> {
        self.categories.iter().find(|c| &c.key == key)
    }

    /// Lowercased searchable text of the item at `index`.
    #[must_use]
    pub fn search_text(&self, index: usize) -> &[String] {
        self.search_text.get(index).map_or(&[], Vec::as_slice)
    }
}

fn decode_items(raw: Vec<serde_json::Value>) -> Vec<Item> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value::<Item>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping catalog item at position {position}: {e}");
                None
            }
        })
        .collect()
}

fn build_search_text(item: &Item) -> Vec<String> {
    item.text_fields()
        .into_iter()
        .flat_map(|field| field.iter().map(|(_, text)| text.to_lowercase()))
        .collect()
}
