//! Shared types for headless commands.

use clap::Args;
use std::fmt;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::Catalog;

/// Process exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad arguments or input that failed validation
    ValidationError = 1,
    /// File system or serialization failure
    IoError = 2,
}

/// Error returned by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code the process should end with
    pub code: ExitCode,
    /// Human-readable message
    pub message: String,
}

impl CliError {
    /// A validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// An I/O failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Exit code as an integer for `std::process::exit`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Where a command reads its catalog from.
#[derive(Debug, Clone, Args)]
pub struct CatalogArgs {
    /// Catalog JSON file (defaults to `paths.catalog` in the config file)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

impl CatalogArgs {
    /// Resolves the catalog path and loads it.
    pub fn load(&self) -> CliResult<Catalog> {
        let path = match &self.catalog {
            Some(path) => path.clone(),
            None => Config::load()
                .map_err(|e| CliError::io(format!("Failed to load config: {e:#}")))?
                .paths
                .catalog
                .ok_or_else(|| {
                    CliError::validation(
                        "No catalog given: pass --catalog FILE or set paths.catalog in the config",
                    )
                })?,
        };

        if !path.exists() {
            return Err(CliError::validation(format!(
                "Catalog file not found: {}",
                path.display()
            )));
        }

        Catalog::load(&path).map_err(|e| CliError::io(format!("Failed to load catalog: {e:#}")))
    }
}

/// Serializes `value` as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::validation("bad").exit_code(), 1);
        assert_eq!(CliError::io("disk").exit_code(), 2);
        assert_eq!(ExitCode::Success as i32, 0);
    }

    #[test]
    fn test_missing_catalog_is_validation_error() {
        let args = CatalogArgs {
            catalog: Some(PathBuf::from("/definitely/not/here.json")),
        };
        let err = args.load().unwrap_err();
        assert_eq!(err.code, ExitCode::ValidationError);
    }
}
