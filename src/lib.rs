//! LazyShelf Library
//!
//! Client-side catalog view-model for a storefront: category and free-text
//! filtering over an in-memory catalog, batch-wise progressive disclosure
//! driven by viewport proximity, and one-shot per-item reveal. The binary
//! hosts it in a terminal browser and exposes headless subcommands.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod display;
pub mod engine;
pub mod logging;
pub mod models;
pub mod tui;
