//! LazyShelf - Terminal storefront catalog browser
//!
//! Browse a catalog export with category tabs, live search and progressive
//! loading, or query it headlessly with the `search`, `categories` and `show`
//! subcommands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lazyshelf::cli::{CategoriesArgs, SearchArgs, ShowArgs};
use lazyshelf::config::Config;
use lazyshelf::constants::{APP_BINARY_NAME, APP_NAME};
use lazyshelf::models::Catalog;
use lazyshelf::{logging, tui};

/// LazyShelf - Terminal storefront catalog browser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog JSON file to browse
    #[arg(value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Display locale (overrides ui.locale for this run)
    #[arg(long, value_name = "LOCALE")]
    locale: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the catalog by category and text
    Search(SearchArgs),
    /// List categories with item counts
    Categories(CategoriesArgs),
    /// Show one item by id or slug
    Show(ShowArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        if let Err(e) = logging::init_stderr(cli.verbose) {
            eprintln!("Warning: {e:#}");
        }
        let result = match command {
            Command::Search(args) => args.execute(),
            Command::Categories(args) => args.execute(),
            Command::Show(args) => args.execute(),
        };
        if let Err(e) = result {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
        return Ok(());
    }

    let log_path = logging::init_file(cli.verbose)?;

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config, using defaults: {e:#}");
        Config::default()
    });
    if let Some(locale) = cli.locale {
        config.ui.locale = locale;
    }

    let Some(path) = cli.catalog.or_else(|| config.paths.catalog.clone()) else {
        eprintln!("No catalog file given.");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {APP_BINARY_NAME} catalog.json");
        eprintln!("  {APP_BINARY_NAME} search --catalog catalog.json --query latte");
        eprintln!();
        eprintln!("Or set a default in the config file:");
        eprintln!("  [paths]");
        eprintln!("  catalog = \"/path/to/catalog.json\"");
        std::process::exit(1);
    };

    if !path.exists() {
        eprintln!("Error: Catalog file not found: {}", path.display());
        std::process::exit(1);
    }

    let catalog = Catalog::load(&path)?;
    tracing::info!(
        "{} v{} browsing {} ({} items), logging to {}",
        APP_NAME,
        env!("CARGO_PKG_VERSION"),
        path.display(),
        catalog.len(),
        log_path.display()
    );

    let theme = tui::Theme::from_mode(config.ui.theme_mode);
    let mut app_state = tui::AppState::new(catalog, &config, theme);

    // Initialize TUI
    let mut terminal = tui::setup_terminal()?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal
    tui::restore_terminal(terminal).context("Failed to restore terminal")?;

    result
}
