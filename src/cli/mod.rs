//! CLI command handlers for LazyShelf.
//!
//! Headless, scriptable access to the catalog: the same filtering and batch
//! disclosure the terminal UI uses, printed as text or JSON.

pub mod categories;
pub mod common;
pub mod search;
pub mod show;

// Re-export types used by main.rs and tests
pub use categories::CategoriesArgs;
pub use common::{CatalogArgs, CliError, CliResult, ExitCode};
pub use search::SearchArgs;
pub use show::ShowArgs;
