//! Command-line interface for tmerge.

pub mod args;

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::commands::{resolve, ResolveError};
use crate::merge::MergeOutcome;

pub use args::GlobalArgs;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during CLI execution.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument processing error.
    #[error("{0}")]
    Args(#[from] args::ArgsError),

    /// Resolve command error.
    #[error("{0}")]
    Resolve(#[from] ResolveError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

// =============================================================================
// CLI Definition
// =============================================================================

/// tmerge - a three-way merge driver for editor text-asset dictionaries.
#[derive(Parser, Debug)]
#[command(name = "tmerge", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Common ancestor file.
    pub base: PathBuf,

    /// Local file; receives the merged result.
    pub local: PathBuf,

    /// Remote file.
    pub remote: PathBuf,
}

// =============================================================================
// CLI Execution
// =============================================================================

impl Cli {
    /// Parse command-line arguments and return the CLI instance.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Run the merge.
    pub fn run(self) -> Result<MergeOutcome> {
        let args = self
            .global
            .to_resolve_args(self.base, self.local, self.remote)?;
        let outcome = resolve(&args)?;

        if outcome.is_clean() {
            println!("Merge successful.");
        } else {
            println!("Merged with errors.");
        }
        Ok(outcome)
    }
}

/// Main entry point for the CLI.
pub fn main() -> Result<MergeOutcome> {
    let cli = Cli::parse_args();
    cli.run()
}
