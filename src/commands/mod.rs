//! Commands module.
//!
//! Top-level tmerge operations, typically invoked by the CLI.

mod resolve;

pub use resolve::{resolve, ConflictReporting, ResolveArgs, ResolveError};
