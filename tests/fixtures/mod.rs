//! Shared test fixtures for catalog and CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use lazyshelf::engine::{CatalogView, ManualObserver, ViewOptions, VisibilityObserver};
use lazyshelf::models::{Catalog, Category, CategoryKey, Item};
use serde_json::json;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tempfile::TempDir;

/// Category key helper for fixtures.
pub fn key(key: &str) -> CategoryKey {
    CategoryKey::new(key).unwrap()
}

/// `count` items named "Item 0".."Item N" all in `category`.
pub fn numbered_catalog(count: usize, category: &str) -> Catalog {
    let items = (0..count)
        .map(|i| Item::new(format!("item-{i}"), format!("Item {i}")).in_category(key(category)))
        .collect();
    Catalog::new(items, vec![Category::new(category, category).unwrap()]).unwrap()
}

/// Deterministic mixed catalog: categories cycle through `a`, `b`, `c` and an
/// uncategorized slot; names alternate between a few words in two locales.
pub fn mixed_catalog(count: usize) -> Catalog {
    let words = [
        ("Dark Roast", "تحميص غامق"),
        ("Light Roast", "تحميص فاتح"),
        ("Cardamom Blend", "خلطة الهيل"),
        ("Espresso Cup", "فنجان إسبريسو"),
        ("Gift Box", "صندوق هدايا"),
    ];
    let categories = ["a", "b", "c"];

    let items = (0..count)
        .map(|i| {
            let (en, ar) = words[i % words.len()];
            let item = Item::new(format!("mixed-{i}"), format!("{en} {i}")).named("ar", ar);
            match i % 4 {
                3 => item,
                slot => item.in_category(key(categories[slot])),
            }
        })
        .collect();
    let categories = categories
        .iter()
        .map(|k| Category::new(*k, k.to_uppercase()).unwrap())
        .collect();
    Catalog::new(items, categories).unwrap()
}

/// View over `catalog` with a manual observer and no reveal delay.
pub fn manual_view(catalog: Catalog, batch_size: usize) -> CatalogView<ManualObserver> {
    view_with(catalog, ManualObserver::new(), batch_size)
}

/// View over `catalog` with the given observer and no reveal delay.
pub fn view_with<O: VisibilityObserver>(
    catalog: Catalog,
    observer: O,
    batch_size: usize,
) -> CatalogView<O> {
    let options = ViewOptions::with_batch_size(NonZeroUsize::new(batch_size).unwrap());
    CatalogView::new(catalog, observer, options)
}

/// A small bilingual coffee shop export in the on-disk format.
pub fn shop_catalog_json() -> String {
    json!({
        "categories": [
            { "id": "c2", "slug": "equipment", "name": { "en": "Equipment", "ar": "معدات" }, "order": 2 },
            { "id": "c1", "slug": "coffee", "name": { "en": "Coffee", "ar": "قهوة" }, "order": 1 }
        ],
        "items": [
            {
                "id": "p1",
                "slug": "dark-roast",
                "name": { "en": "Dark Roast", "ar": "تحميص غامق" },
                "description": { "en": "Bold and smoky", "ar": null },
                "category": "coffee",
                "price": 45.0,
                "rating": 4.5,
                "featured": true,
                "roastLevel": "dark",
                "origin": "Yemen",
                "createdAt": "2024-03-01T10:00:00Z"
            },
            {
                "id": "p2",
                "slug": "light-roast",
                "name": { "en": "Light Roast", "ar": "تحميص فاتح" },
                "category": { "slug": "coffee" },
                "price": 40.0,
                "rating": 4.0,
                "roastLevel": "light"
            },
            {
                "id": "p3",
                "slug": "pour-over-kettle",
                "name": { "en": "Pour-over Kettle", "ar": "غلاية" },
                "category": "equipment",
                "price": 120.5,
                "rating": 3.5,
                "inStock": false
            },
            {
                "id": "p4",
                "slug": "gift-card",
                "name": { "en": "Gift Card" },
                "price": 100.0
            },
            {
                "id": "p5",
                "slug": "mystery-box",
                "name": { "en": "Mystery Box" },
                "category": "discontinued",
                "price": 60.0,
                "featured": true
            }
        ]
    })
    .to_string()
}

/// Writes `json` to a temp file; keep the `TempDir` alive while using the path.
pub fn create_temp_catalog_file(json: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.json");
    fs::write(&path, json).unwrap();
    (path, temp_dir)
}
