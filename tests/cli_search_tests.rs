//! End-to-end tests for `lazyshelf search`.

use serde::Deserialize;
use std::process::Command;

mod fixtures;
use fixtures::*;

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: String,
    name: String,
    category: Option<String>,
    price: f64,
    featured: bool,
    in_stock: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    category: String,
    query: String,
    count: usize,
    shown: usize,
    has_more: bool,
    footer: String,
    items: Vec<SearchItem>,
    message: String,
}

/// Path to the lazyshelf binary (set by cargo at compile time)
fn lazyshelf_bin() -> &'static str {
    env!("CARGO_BIN_EXE_lazyshelf")
}

fn search_json(catalog: &str, extra: &[&str]) -> SearchResponse {
    let output = Command::new(lazyshelf_bin())
        .args(["search", "--catalog", catalog, "--json"])
        .args(extra)
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("search --json should print JSON")
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_search_all_items() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let response = search_json(path.to_str().unwrap(), &[]);

    assert_eq!(response.category, "all");
    assert_eq!(response.query, "");
    assert_eq!(response.count, 5);
    assert_eq!(response.shown, 5);
    assert!(!response.has_more);
    assert_eq!(response.footer, "hidden");
    assert_eq!(response.message, "Found 5 products");

    let ids: Vec<&str> = response.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5"]);
}

#[test]
fn test_search_by_category_includes_embedded_reference() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let response = search_json(path.to_str().unwrap(), &["--category", "coffee"]);

    assert_eq!(response.count, 2);
    assert!(response
        .items
        .iter()
        .all(|i| i.category.as_deref() == Some("coffee")));
}

#[test]
fn test_search_query_matches_either_locale() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let catalog = path.to_str().unwrap();

    let english = search_json(catalog, &["--query", "ROAST"]);
    assert_eq!(english.count, 2);

    let arabic = search_json(catalog, &["--query", "غامق"]);
    assert_eq!(arabic.count, 1);
    assert_eq!(arabic.items[0].id, "p1");
    assert_eq!(arabic.items[0].name, "Dark Roast");

    let arabic_names = search_json(catalog, &["--query", "غامق", "--locale", "ar"]);
    assert_eq!(arabic_names.items[0].name, "تحميص غامق");
}

#[test]
fn test_search_refinements() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let catalog = path.to_str().unwrap();

    let featured = search_json(catalog, &["--featured"]);
    assert!(featured.items.iter().all(|i| i.featured));
    assert_eq!(featured.count, 2);

    let priced = search_json(catalog, &["--min-price", "45", "--max-price", "100"]);
    let ids: Vec<&str> = priced.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p4", "p5"]);
    assert!(priced.items.iter().all(|i| (45.0..=100.0).contains(&i.price)));

    let out_of_stock = search_json(catalog, &["--category", "equipment"]);
    assert!(!out_of_stock.items[0].in_stock);
}

#[test]
fn test_search_no_results_footer() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let response = search_json(path.to_str().unwrap(), &["--query", "nomatch"]);
    assert_eq!(response.count, 0);
    assert_eq!(response.footer, "no_results");
    assert!(response.items.is_empty());
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_search_batches_reveal_through_disclosure() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let catalog = path.to_str().unwrap();

    let first = search_json(catalog, &["--batch-size", "2", "--batches", "1"]);
    assert_eq!(first.shown, 2);
    assert!(first.has_more);
    assert_eq!(first.footer, "load_more");

    let two = search_json(catalog, &["--batch-size", "2", "--batches", "2"]);
    assert_eq!(two.shown, 4);

    let all = search_json(catalog, &["--batch-size", "2", "--batches", "9"]);
    assert_eq!(all.shown, 5);
    assert!(!all.has_more);
    assert_eq!(all.footer, "end_of_results");
}

#[test]
fn test_search_limit() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let response = search_json(path.to_str().unwrap(), &["--limit", "3"]);
    assert_eq!(response.shown, 3);
    assert_eq!(response.count, 5);
    assert_eq!(response.items.len(), 3);
}

#[test]
fn test_search_limit_keeps_has_more_and_footer_consistent() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let catalog = path.to_str().unwrap();

    // Everything revealed, output trimmed: nothing more to load
    let trimmed = search_json(catalog, &["--limit", "2"]);
    assert_eq!(trimmed.shown, 2);
    assert!(!trimmed.has_more);
    assert_eq!(trimmed.footer, "hidden");

    // One batch revealed, output trimmed further: more is still loadable
    let partial = search_json(catalog, &["--batch-size", "2", "--batches", "1", "--limit", "1"]);
    assert_eq!(partial.shown, 1);
    assert!(partial.has_more);
    assert_eq!(partial.footer, "load_more");
}

// ============================================================================
// Errors and plain output
// ============================================================================

#[test]
fn test_search_invalid_price_range() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let output = Command::new(lazyshelf_bin())
        .args([
            "search",
            "--catalog",
            path.to_str().unwrap(),
            "--min-price",
            "100",
            "--max-price",
            "10",
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--min-price"));
}

#[test]
fn test_search_missing_catalog_file() {
    let output = Command::new(lazyshelf_bin())
        .args(["search", "--catalog", "/nonexistent/catalog.json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_search_malformed_catalog_is_io_error() {
    let (path, _temp_dir) = create_temp_catalog_file("{ not json");
    let output = Command::new(lazyshelf_bin())
        .args(["search", "--catalog", path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_search_plain_output() {
    let (path, _temp_dir) = create_temp_catalog_file(&shop_catalog_json());
    let output = Command::new(lazyshelf_bin())
        .args(["search", "--catalog", path.to_str().unwrap(), "--query", "kettle"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 1 products"));
    assert!(stdout.contains("Pour-over Kettle"));
    assert!(stdout.contains("120.50"));
}
