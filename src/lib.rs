//! textmerge-rs - A three-way merge driver for editor text-asset dictionaries.
//!
//! Merges key/value dictionaries embedded in line-oriented asset files while
//! preserving every byte outside the dictionary regions. Changes made on both
//! sides relative to a common ancestor are combined; incompatible changes to
//! the same key are reported as conflicts and left unapplied.

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod merge;
pub mod util;

pub use config::MarkerConfig;
pub use document::{Document, DocumentParser, ParseError, RawLine};
pub use merge::{
    apply, diff, extract_data, merge, write_data, ConflictPair, Data, MergeError, MergeOutcome,
};
pub use util::OrderedMap;
