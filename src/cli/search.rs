//! Headless catalog search.
//!
//! Runs the same filter and disclosure engines as the terminal UI, plus the
//! storefront listing refinements (featured, price range).

use clap::Args;
use serde::Serialize;
use std::num::NonZeroUsize;

use super::common::{print_json, CatalogArgs, CliError, CliResult};
use crate::constants::{ALL_CATEGORIES, DEFAULT_BATCH_SIZE, DEFAULT_LOCALE};
use crate::display::{plain_price, rating_stars, truncate};
use crate::engine::{filter_items, Disclosure, Footer, FilterState};
use crate::models::Item;

/// Search the catalog by category and text
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: CatalogArgs,

    /// Category key, or "all"
    #[arg(short, long, default_value = ALL_CATEGORIES)]
    pub category: String,

    /// Free-text query matched against every locale
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Only featured items
    #[arg(long)]
    pub featured: bool,

    /// Minimum price (inclusive)
    #[arg(long, value_name = "PRICE")]
    pub min_price: Option<f64>,

    /// Maximum price (inclusive)
    #[arg(long, value_name = "PRICE")]
    pub max_price: Option<f64>,

    /// Number of batches to reveal (default: everything)
    #[arg(long, value_name = "N")]
    pub batches: Option<usize>,

    /// Print at most this many items (does not affect `has_more`)
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Items per batch
    #[arg(long, value_name = "N", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Display locale for names
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SearchItem {
    id: String,
    name: String,
    category: Option<String>,
    price: f64,
    rating: f32,
    featured: bool,
    in_stock: bool,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    category: String,
    query: String,
    count: usize,
    shown: usize,
    has_more: bool,
    footer: Footer,
    items: Vec<SearchItem>,
    message: String,
}

impl SearchArgs {
    fn validate(&self) -> CliResult<NonZeroUsize> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(CliError::validation(format!(
                    "--min-price ({min}) is greater than --max-price ({max})"
                )));
            }
        }
        if self.batches == Some(0) {
            return Err(CliError::validation("--batches must be at least 1"));
        }
        NonZeroUsize::new(self.batch_size)
            .ok_or_else(|| CliError::validation("--batch-size must be at least 1"))
    }

    fn refine(&self, item: &Item) -> bool {
        (!self.featured || item.featured)
            && self.min_price.map_or(true, |min| item.price >= min)
            && self.max_price.map_or(true, |max| item.price <= max)
    }

    /// Execute the search command
    pub fn execute(&self) -> CliResult<()> {
        let batch_size = self.validate()?;
        let catalog = self.source.load()?;

        let state = FilterState::new(&self.category, self.query.clone());
        let matches: Vec<&Item> = filter_items(&catalog, &state)
            .into_iter()
            .filter(|item| self.refine(item))
            .collect();

        let mut disclosure = Disclosure::new(batch_size);
        let generation = disclosure.reset(matches.len());
        let batches = self.batches.unwrap_or(usize::MAX);
        for _ in 1..batches {
            if !disclosure.has_more() {
                break;
            }
            disclosure.grow(generation);
        }

        let range = disclosure.visible_range();
        let end = self
            .limit
            .map_or(range.end, |limit| range.end.min(range.start + limit));
        let shown = &matches[range.start..end];
        tracing::debug!("search matched {} items, showing {}", matches.len(), shown.len());

        let response = SearchResponse {
            category: state.category.to_string(),
            query: state.query.clone(),
            count: matches.len(),
            shown: shown.len(),
            has_more: disclosure.has_more(),
            footer: disclosure.footer(),
            items: shown
                .iter()
                .map(|item| SearchItem {
                    id: item.id.to_string(),
                    name: item.title(&self.locale).to_string(),
                    category: item.category.as_ref().map(ToString::to_string),
                    price: item.price,
                    rating: item.rating,
                    featured: item.featured,
                    in_stock: item.in_stock,
                })
                .collect(),
            message: format!("Found {} products", matches.len()),
        };

        if self.json {
            return print_json(&response);
        }

        if response.count == 0 {
            println!("No results.");
            return Ok(());
        }

        println!("{}", response.message);
        println!();
        for item in shown {
            println!(
                "  {:<14} {:<32} {:>10}  {}",
                item.id.as_str(),
                truncate(item.title(&self.locale), 30),
                plain_price(item.price),
                rating_stars(item.rating)
            );
        }
        if response.has_more {
            println!();
            println!(
                "Showing {} of {}. Use --batches to reveal more.",
                response.shown, response.count
            );
        }

        Ok(())
    }
}
