//! End-to-end tests for `lazyshelf categories`.

use serde::Deserialize;
use std::process::Command;

mod fixtures;
use fixtures::*;

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    key: String,
    name: String,
    items: usize,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Vec<CategoryEntry>,
    count: usize,
    total_items: usize,
}

/// Path to the lazyshelf binary (set by cargo at compile time)
fn lazyshelf_bin() -> &'static str {
    env!("CARGO_BIN_EXE_lazyshelf")
}

#[test]
fn test_categories_json_in_display_order() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let output = Command::new(lazyshelf_bin())
        .args(["categories", "--catalog", path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let response: CategoriesResponse = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(response.count, 2);
    assert_eq!(response.total_items, 5);
    // Sorted by `order`, not document order
    assert_eq!(response.categories[0].key, "coffee");
    assert_eq!(response.categories[0].items, 2);
    assert_eq!(response.categories[1].key, "equipment");
    assert_eq!(response.categories[1].items, 1);
}

#[test]
fn test_categories_localized_labels() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let output = Command::new(lazyshelf_bin())
        .args([
            "categories",
            "--catalog",
            path.to_str().unwrap(),
            "--locale",
            "ar",
            "--json",
        ])
        .output()
        .expect("Failed to execute command");

    let response: CategoriesResponse = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response.categories[0].name, "قهوة");
}

#[test]
fn test_categories_plain_output() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let output = Command::new(lazyshelf_bin())
        .args(["categories", "--catalog", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("all"));
    assert!(stdout.contains("Coffee"));
    assert!(stdout.contains("Equipment"));
}

#[test]
fn test_categories_empty_catalog() {
    let (path, _temp_dir) = create_temp_catalog_file(r#"{"items": [], "categories": []}"#);
    let output = Command::new(lazyshelf_bin())
        .args(["categories", "--catalog", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No categories defined."));
}

#[test]
fn test_categories_reserved_key_rejected() {
    let json = r#"{"items": [], "categories": [{"slug": "all", "name": {"en": "All"}}]}"#;
    let (path, _temp_dir) = create_temp_catalog_file(json);
    let output = Command::new(lazyshelf_bin())
        .args(["categories", "--catalog", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}
