//! Lossless document parsing for dictionary-bearing asset files.
//!
//! This module owns the raw side of the pipeline: reading a text document
//! into a block chain that preserves every byte, locating the embedded
//! dictionaries, and writing the chain back out unchanged except for the
//! dictionary regions the merge replaced.

pub mod block;
mod document;
pub mod error;
pub mod line;
pub mod parser;

pub use document::Document;
pub use error::{ParseError, Result};
pub use line::RawLine;
pub use parser::DocumentParser;

/// The three dictionary kinds a document may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryKind {
    /// Int-keyed text table.
    Text,
    /// Int-keyed version/editor-info table.
    Version,
    /// String-keyed text collection table.
    Collection,
}

impl std::fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictionaryKind::Text => write!(f, "text"),
            DictionaryKind::Version => write!(f, "version"),
            DictionaryKind::Collection => write!(f, "collection"),
        }
    }
}
