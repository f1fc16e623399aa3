//! Category listing for a catalog.

use clap::Args;
use serde::Serialize;

use super::common::{print_json, CatalogArgs, CliResult};
use crate::constants::{ALL_CATEGORIES, DEFAULT_LOCALE};
use crate::engine::{filter, FilterState};

/// List the catalog's categories with item counts
#[derive(Debug, Clone, Args)]
pub struct CategoriesArgs {
    #[command(flatten)]
    pub source: CatalogArgs,

    /// Display locale for labels
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// JSON response types
#[derive(Debug, Serialize)]
struct CategoryEntry {
    key: String,
    name: String,
    items: usize,
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: Vec<CategoryEntry>,
    count: usize,
    total_items: usize,
}

impl CategoriesArgs {
    /// Execute the categories command
    pub fn execute(&self) -> CliResult<()> {
        let catalog = self.source.load()?;

        let categories: Vec<CategoryEntry> = catalog
            .categories()
            .iter()
            .map(|category| CategoryEntry {
                key: category.key.to_string(),
                name: category.label(&self.locale).to_string(),
                items: filter(&catalog, &FilterState::new(category.key.as_str(), "")).len(),
            })
            .collect();

        let response = CategoriesResponse {
            count: categories.len(),
            categories,
            total_items: catalog.len(),
        };

        if self.json {
            return print_json(&response);
        }

        println!("  {:<20} {:<30} {}", ALL_CATEGORIES, "All", response.total_items);
        if response.count == 0 {
            println!();
            println!("No categories defined.");
            return Ok(());
        }
        for category in &response.categories {
            println!("  {:<20} {:<30} {}", category.key, category.name, category.items);
        }

        Ok(())
    }
}
